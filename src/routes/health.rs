// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Reports liveness and per-feature configuration status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Health check routes for container orchestration
//!
//! The health endpoint is unauthenticated and also reports which optional
//! AI features are configured, so clients can hide disabled functionality.

use super::ServerResources;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /api/health
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "gemini_configured": resources.config.gemini_enabled(),
            "spoonacular_configured": resources.config.spoonacular_enabled(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}
