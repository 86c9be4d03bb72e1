// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment-derived configuration built once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Configuration module for Pantry Server
//!
//! Process-wide configuration is an immutable [`ServerConfig`] constructed
//! once at startup from environment variables and passed by reference to
//! services; nothing reads the environment after startup.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    DatabaseConfig, DatabaseUrl, GeminiConfig, ServerConfig, SpoonacularConfig,
};
