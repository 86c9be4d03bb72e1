// ABOUTME: External API clients for AI generation and recipe discovery
// ABOUTME: Thin pass-through adapters; absence of an API key disables a client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! External API clients
//!
//! Both clients are optional: they are only constructed when the matching
//! API key is configured, and upstream failures surface as
//! service-unavailable outcomes with no automatic retry.

/// Google Gemini client for recipe and grocery suggestions
pub mod gemini;

/// Spoonacular client for recipe discovery and import
pub mod spoonacular;

pub use gemini::GeminiClient;
pub use spoonacular::SpoonacularClient;
