// ABOUTME: Route module organization for Pantry Server HTTP endpoints
// ABOUTME: Holds shared server state and assembles the full axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Route module for Pantry Server
//!
//! Each domain module contains route definitions and thin handler functions
//! that delegate to the database managers and external clients. Handlers
//! share one [`ServerResources`] instance built at startup.

use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::external::{GeminiClient, SpoonacularClient};
use axum::Router;
use http::header::HeaderName;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Recipe discovery and AI suggestion routes
pub mod discovery;
/// Health check and system status routes
pub mod health;
/// Item, barcode, and list routes
pub mod items;
/// Recipe CRUD and availability routes
pub mod recipes;

pub use discovery::DiscoveryRoutes;
pub use health::HealthRoutes;
pub use items::ItemsRoutes;
pub use recipes::RecipesRoutes;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Immutable startup configuration
    pub config: ServerConfig,
    /// Gemini client, present only when the API key is configured
    pub gemini: Option<GeminiClient>,
    /// Spoonacular client, present only when the API key is configured
    pub spoonacular: Option<SpoonacularClient>,
}

impl ServerResources {
    /// Build server resources, constructing external clients for every
    /// configured API key
    ///
    /// # Errors
    ///
    /// Returns an error if a configured client fails to build
    pub fn new(database: Database, config: ServerConfig) -> AppResult<Self> {
        let gemini = if config.gemini_enabled() {
            info!("Gemini AI endpoints enabled");
            Some(GeminiClient::from_config(&config.gemini)?)
        } else {
            info!("Gemini AI endpoints disabled (no GEMINI_API_KEY)");
            None
        };

        let spoonacular = if config.spoonacular_enabled() {
            info!("Spoonacular discovery endpoints enabled");
            Some(SpoonacularClient::from_config(&config.spoonacular)?)
        } else {
            info!("Spoonacular discovery endpoints disabled (no SPOONACULAR_API_KEY)");
            None
        };

        Ok(Self {
            database,
            config,
            gemini,
            spoonacular,
        })
    }
}

/// Assemble the full application router with middleware layers
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(ItemsRoutes::routes(resources.clone()))
        .merge(RecipesRoutes::routes(resources.clone()))
        .merge(DiscoveryRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Permissive CORS for the local web client
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(tower_http::cors::AllowMethods::any())
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
        ])
}
