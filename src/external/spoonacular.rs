// ABOUTME: Spoonacular API client for recipe discovery, details, and import
// ABOUTME: Converts upstream recipe payloads into the local recipe format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Spoonacular Client
//!
//! Pass-through adapter to the Spoonacular recipe API. Discovery is driven by
//! the current inventory via `findByIngredients`; imported recipes are
//! converted to the local format here when the Gemini parser is unavailable.
//!
//! ## Configuration
//!
//! Set the `SPOONACULAR_API_KEY` environment variable. Without it the
//! discovery endpoints report `FEATURE_NOT_CONFIGURED` instead of calling out.

use crate::config::SpoonacularConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{NewRecipe, RecipeIngredient, RecipeStep};
use regex::Regex;
use reqwest::Client;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tracing::{debug, instrument};

/// Request timeout for search and detail calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// URL extraction can take longer than regular calls
const EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound the API places on result counts
const MAX_RESULTS: u32 = 100;

/// Client for the Spoonacular recipe API
#[derive(Clone)]
pub struct SpoonacularClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl Debug for SpoonacularClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SpoonacularClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SpoonacularClient {
    /// Create a client from a configuration section with a present API key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is set
    pub fn from_config(config: &SpoonacularConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("SPOONACULAR_API_KEY environment variable not set"))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// Get detailed information about one upstream recipe
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the API call fails
    #[instrument(skip(self))]
    pub async fn recipe_details(&self, recipe_id: i64) -> AppResult<serde_json::Value> {
        let url = format!("{}/recipes/{recipe_id}/information", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("includeNutrition", "false"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("Spoonacular", format!("Request failed: {e}"))
            })?;

        Self::json_body(response).await
    }

    /// Find recipes by the ingredients on hand
    ///
    /// Uses ranking mode 2 (minimize missing ingredients) and ignores
    /// common pantry staples, matching the upstream defaults we want.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the API call fails
    #[instrument(skip(self, ingredients), fields(count = ingredients.len()))]
    pub async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        number: u32,
    ) -> AppResult<serde_json::Value> {
        let url = format!("{}/recipes/findByIngredients", self.base_url);
        let ingredients_param = ingredients.join(",");
        let number_param = number.min(MAX_RESULTS).to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("ingredients", ingredients_param.as_str()),
                ("number", number_param.as_str()),
                ("ranking", "2"),
                ("ignorePantry", "true"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("Spoonacular", format!("Request failed: {e}"))
            })?;

        Self::json_body(response).await
    }

    /// Extract recipe data from a website URL
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the API call fails
    #[instrument(skip(self))]
    pub async fn extract_from_url(&self, page_url: &str) -> AppResult<serde_json::Value> {
        let url = format!("{}/recipes/extract", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(EXTRACT_TIMEOUT)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("url", page_url),
                ("forceExtraction", "true"),
                ("analyze", "true"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::external_service("Spoonacular", format!("Request failed: {e}"))
            })?;

        Self::json_body(response).await
    }

    /// Read a response body as JSON, mapping failures to upstream errors
    async fn json_body(response: reqwest::Response) -> AppResult<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Spoonacular API error");
            return Err(AppError::external_service(
                "Spoonacular",
                format!("API error ({status}): {body}"),
            ));
        }

        response.json().await.map_err(|e| {
            AppError::external_service("Spoonacular", format!("Unparseable response: {e}"))
        })
    }
}

/// Convert an upstream recipe payload to the local recipe format
///
/// Fallback parser used when the Gemini parser is not configured. Reads
/// `extendedIngredients` and `analyzedInstructions`, falling back to
/// sentence-splitting the flat `instructions` text with HTML tags stripped.
#[must_use]
pub fn convert_to_local(upstream: &serde_json::Value) -> NewRecipe {
    let ingredients: Vec<RecipeIngredient> = upstream["extendedIngredients"]
        .as_array()
        .map(|list| {
            list.iter()
                .map(|ing| RecipeIngredient {
                    name: ing["name"]
                        .as_str()
                        .or_else(|| ing["original"].as_str())
                        .unwrap_or("")
                        .to_owned(),
                    amount: ing["amount"].as_f64().map(|a| a.to_string()),
                    unit: ing["unit"].as_str().filter(|u| !u.is_empty()).map(str::to_owned),
                    notes: ing["meta"]
                        .as_array()
                        .and_then(|m| m.first())
                        .and_then(|n| n.as_str())
                        .map(str::to_owned),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut steps: Vec<RecipeStep> = Vec::new();
    if let Some(instructions) = upstream["analyzedInstructions"].as_array() {
        for instruction in instructions {
            if let Some(inner) = instruction["steps"].as_array() {
                for step in inner {
                    steps.push(RecipeStep {
                        step_number: step["number"].as_i64().unwrap_or(steps.len() as i64 + 1),
                        instruction: step["step"].as_str().unwrap_or("").to_owned(),
                    });
                }
            }
        }
    }

    // No analyzed instructions: split the flat text into sentences
    if steps.is_empty() {
        if let Some(text) = upstream["instructions"].as_str() {
            let clean = strip_html_tags(text);
            for (i, sentence) in split_sentences(&clean).into_iter().enumerate() {
                steps.push(RecipeStep {
                    step_number: i as i64 + 1,
                    instruction: sentence,
                });
            }
        }
    }

    let description = upstream["summary"].as_str().map(|summary| {
        let clean = strip_html_tags(summary);
        clean.chars().take(500).collect::<String>()
    });

    NewRecipe {
        name: upstream["title"]
            .as_str()
            .unwrap_or("Untitled Recipe")
            .to_owned(),
        description,
        servings: upstream["servings"].as_i64().unwrap_or(4),
        prep_time_minutes: upstream["preparationMinutes"].as_i64(),
        cook_time_minutes: upstream["cookingMinutes"]
            .as_i64()
            .or_else(|| upstream["readyInMinutes"].as_i64()),
        is_favorite: false,
        source_url: upstream["sourceUrl"].as_str().map(str::to_owned),
        image_url: upstream["image"].as_str().map(str::to_owned),
        external_id: upstream["id"].as_i64(),
        ingredients,
        steps,
    }
}

/// Remove HTML tags from instruction or summary text
fn strip_html_tags(text: &str) -> String {
    Regex::new(r"<[^>]+>").ok().map_or_else(
        || text.to_owned(),
        |tags| tags.replace_all(text, "").into_owned(),
    )
}

/// Split text into sentences on `.`, `!`, or `?` followed by whitespace
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_owned());
            }
            current.clear();
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_owned());
    }
    sentences
}
