// ABOUTME: Route handlers for AI suggestions and recipe discovery
// ABOUTME: Pass-through endpoints gated on configured external API keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! AI and discovery routes
//!
//! These endpoints are thin adapters over the Gemini and Spoonacular
//! clients. When the corresponding API key is unset they answer with a
//! `FEATURE_NOT_CONFIGURED` outcome instead of attempting the call, and
//! upstream failures surface as service-unavailable with no retry.

use super::ServerResources;
use crate::errors::AppError;
use crate::external::{spoonacular, GeminiClient, SpoonacularClient};
use crate::models::NewRecipe;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Default number of discovery search results
const DEFAULT_SEARCH_RESULTS: u32 = 10;

/// Request body for recipe suggestions
#[derive(Debug, Deserialize, Default)]
pub struct RecipeSuggestionsBody {
    /// Optional guidance, e.g. "soup recipes" or "quick dinner"
    #[serde(default)]
    pub query: Option<String>,
}

/// Request body for grocery suggestions
#[derive(Debug, Deserialize, Default)]
pub struct GrocerySuggestionsBody {
    /// Optional dietary preferences
    #[serde(default)]
    pub preferences: Option<String>,
}

/// Request body for a discovery search
#[derive(Debug, Deserialize, Default)]
pub struct DiscoverySearchBody {
    /// Number of results to return
    #[serde(default)]
    pub number: Option<u32>,
}

/// Request body for importing a recipe from a web page
#[derive(Debug, Deserialize)]
pub struct ImportUrlBody {
    /// URL of the recipe page to extract
    pub url: String,
}

/// Discovery routes handler
pub struct DiscoveryRoutes;

impl DiscoveryRoutes {
    /// Create all AI and discovery routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/ai/recipe-suggestions",
                post(Self::handle_recipe_suggestions),
            )
            .route(
                "/api/ai/grocery-suggestions",
                post(Self::handle_grocery_suggestions),
            )
            .route("/api/discovery/recipe/:id", get(Self::handle_recipe_details))
            .route("/api/discovery/search", post(Self::handle_search))
            .route("/api/discovery/import/:id", post(Self::handle_import))
            .route("/api/discovery/import-url", post(Self::handle_import_url))
            .with_state(resources)
    }

    /// The Gemini client, or a `FEATURE_NOT_CONFIGURED` outcome
    fn gemini(resources: &ServerResources) -> Result<&GeminiClient, AppError> {
        resources
            .gemini
            .as_ref()
            .ok_or_else(|| AppError::not_configured("Gemini API", "GEMINI_API_KEY"))
    }

    /// The Spoonacular client, or a `FEATURE_NOT_CONFIGURED` outcome
    fn spoonacular(resources: &ServerResources) -> Result<&SpoonacularClient, AppError> {
        resources
            .spoonacular
            .as_ref()
            .ok_or_else(|| AppError::not_configured("Spoonacular API", "SPOONACULAR_API_KEY"))
    }

    /// Handle POST /api/ai/recipe-suggestions
    async fn handle_recipe_suggestions(
        State(resources): State<Arc<ServerResources>>,
        body: Option<Json<RecipeSuggestionsBody>>,
    ) -> Result<Response, AppError> {
        let gemini = Self::gemini(&resources)?;

        let inventory = resources.database.items().inventory_names().await?;
        if inventory.is_empty() {
            return Err(AppError::invalid_input(
                "No items in inventory. Add some items first.",
            ));
        }

        let query = body.as_ref().and_then(|b| b.query.as_deref());
        let suggestions = gemini.recipe_suggestions(&inventory, query).await?;

        Ok((StatusCode::OK, Json(suggestions)).into_response())
    }

    /// Handle POST /api/ai/grocery-suggestions
    async fn handle_grocery_suggestions(
        State(resources): State<Arc<ServerResources>>,
        body: Option<Json<GrocerySuggestionsBody>>,
    ) -> Result<Response, AppError> {
        let gemini = Self::gemini(&resources)?;

        let inventory = resources.database.items().inventory_names().await?;
        let favorites = resources.database.recipes().list(true).await?;

        let preferences = body.as_ref().and_then(|b| b.preferences.as_deref());
        let suggestions = gemini
            .grocery_suggestions(&inventory, &favorites, preferences)
            .await?;

        Ok((StatusCode::OK, Json(suggestions)).into_response())
    }

    /// Handle GET /api/discovery/recipe/:id - Upstream recipe details
    async fn handle_recipe_details(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let spoonacular = Self::spoonacular(&resources)?;
        let details = spoonacular.recipe_details(id).await?;
        Ok((StatusCode::OK, Json(details)).into_response())
    }

    /// Handle POST /api/discovery/search - Find recipes from the inventory
    ///
    /// When Gemini is configured, ingredient names are translated to English
    /// first; otherwise the raw names are used.
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        body: Option<Json<DiscoverySearchBody>>,
    ) -> Result<Response, AppError> {
        let spoonacular = Self::spoonacular(&resources)?;

        let inventory = resources.database.items().inventory_names().await?;
        if inventory.is_empty() {
            return Err(AppError::invalid_input(
                "No items in inventory. Add some items first.",
            ));
        }

        let english = match resources.gemini.as_ref() {
            Some(gemini) => gemini.translate_ingredients(&inventory).await,
            None => inventory.clone(),
        };

        let number = body
            .as_ref()
            .and_then(|b| b.number)
            .unwrap_or(DEFAULT_SEARCH_RESULTS);
        let recipes = spoonacular.search_by_ingredients(&english, number).await?;

        Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "recipes": recipes,
                "ingredients_used": inventory,
                "ingredients_english": english,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/discovery/import/:id - Import an upstream recipe
    async fn handle_import(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let spoonacular = Self::spoonacular(&resources)?;
        let upstream = spoonacular.recipe_details(id).await?;

        let recipe = Self::save_imported(&resources, upstream).await?;
        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    /// Handle POST /api/discovery/import-url - Import a recipe from a web page
    async fn handle_import_url(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<ImportUrlBody>,
    ) -> Result<Response, AppError> {
        if body.url.trim().is_empty() {
            return Err(AppError::invalid_input("URL must not be empty"));
        }

        let spoonacular = Self::spoonacular(&resources)?;
        let upstream = spoonacular.extract_from_url(&body.url).await?;

        let recipe = Self::save_imported(&resources, upstream).await?;
        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    /// Parse an upstream recipe (Gemini when configured, local fallback
    /// otherwise) and save it
    async fn save_imported(
        resources: &ServerResources,
        upstream: serde_json::Value,
    ) -> Result<crate::models::Recipe, AppError> {
        let mut parsed: NewRecipe = match resources.gemini.as_ref() {
            Some(gemini) => {
                let mut recipe = gemini.parse_recipe(&upstream).await?;
                // The model output carries no source metadata; take it from
                // the upstream payload directly
                recipe.source_url = upstream["sourceUrl"].as_str().map(str::to_owned);
                recipe.image_url = upstream["image"].as_str().map(str::to_owned);
                recipe.external_id = upstream["id"].as_i64();
                recipe
            }
            None => spoonacular::convert_to_local(&upstream),
        };
        parsed.is_favorite = false;

        resources.database.recipes().create(&parsed).await
    }
}
