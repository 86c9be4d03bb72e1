// ABOUTME: Main library entry point for the Pantry Server inventory platform
// ABOUTME: Provides a local-first HTTP API for barcode-driven inventory tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

#![deny(unsafe_code)]

//! # Pantry Server
//!
//! A local-first household inventory and grocery list tracker. Items are
//! identified by scanned barcodes and move between three locations
//! (inventory, grocery list, archived), with optional AI-assisted recipe
//! suggestions layered on top.
//!
//! ## Features
//!
//! - **Barcode scanning**: resolve a scanned code to an item, or register
//!   new items on first scan
//! - **Three-state tracking**: inventory, grocery list, and archived items
//! - **Recipes**: saved recipes with ingredient availability against the
//!   current inventory
//! - **AI suggestions**: optional Gemini-backed recipe and grocery
//!   suggestions, and Spoonacular-backed recipe discovery
//!
//! ## Quick Start
//!
//! 1. Point `DATABASE_PATH` at a writable SQLite file (defaults to
//!    `./data/pantry.db`)
//! 2. Optionally set `GEMINI_API_KEY` and `SPOONACULAR_API_KEY`
//! 3. Start the server with `pantry-server`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pantry_server::config::ServerConfig;
//! use pantry_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Pantry Server configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management built once at startup
pub mod config;

/// Database access layer over SQLite
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// External API clients (Gemini, Spoonacular)
pub mod external;

/// Production logging and structured output
pub mod logging;

/// Common data models for items, barcodes, and recipes
pub mod models;

/// HTTP routes and shared server state
pub mod routes;
