// ABOUTME: Route handlers for recipe CRUD, favorites, and availability
// ABOUTME: Exposes saved recipes and the can-make inventory overlap report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Recipe routes
//!
//! Recipes are independent of the item state machine except for the
//! can-make report, which checks ingredient names against the current
//! inventory.

use super::ServerResources;
use crate::errors::AppError;
use crate::models::{NewRecipe, RecipePatch, RecipeReplace};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for listing recipes
#[derive(Debug, Deserialize, Default)]
pub struct ListRecipesQuery {
    /// Restrict to favorites
    #[serde(default)]
    pub favorites_only: bool,
}

/// Response for listing recipes
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeListResponse {
    /// Number of recipes returned
    pub count: usize,
    /// The recipes, newest first
    pub recipes: Vec<crate::models::Recipe>,
}

/// Response for a deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: i64,
}

/// Recipes routes handler
pub struct RecipesRoutes;

impl RecipesRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route("/api/recipes/:id", get(Self::handle_get))
            .route("/api/recipes/:id", patch(Self::handle_patch))
            .route("/api/recipes/:id", put(Self::handle_replace))
            .route("/api/recipes/:id", delete(Self::handle_delete))
            .route("/api/recipes/:id/favorite", post(Self::handle_favorite))
            .route("/api/recipes/:id/can-make", get(Self::handle_can_make))
            .with_state(resources)
    }

    /// Handle GET /api/recipes - List saved recipes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let recipes = resources
            .database
            .recipes()
            .list(query.favorites_only)
            .await?;

        let response = RecipeListResponse {
            count: recipes.len(),
            recipes,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/recipes - Create a new recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<NewRecipe>,
    ) -> Result<Response, AppError> {
        let recipe = resources.database.recipes().create(&body).await?;
        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    /// Handle GET /api/recipes/:id - Get a single recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .database
            .recipes()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle PATCH /api/recipes/:id - Update metadata only
    async fn handle_patch(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
        Json(body): Json<RecipePatch>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .database
            .recipes()
            .update_metadata(id, &body)
            .await?;

        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle PUT /api/recipes/:id - Full update including children
    async fn handle_replace(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
        Json(body): Json<RecipeReplace>,
    ) -> Result<Response, AppError> {
        let recipe = resources.database.recipes().replace(id, &body).await?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - Delete a recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        resources.database.recipes().delete(id).await?;
        Ok((StatusCode::OK, Json(DeleteResponse { deleted: true, id })).into_response())
    }

    /// Handle POST /api/recipes/:id/favorite - Toggle the favorite flag
    async fn handle_favorite(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let recipe = resources.database.recipes().toggle_favorite(id).await?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle GET /api/recipes/:id/can-make - Inventory availability report
    async fn handle_can_make(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let report = resources.database.recipes().can_make(id).await?;
        Ok((StatusCode::OK, Json(report)).into_response())
    }
}
