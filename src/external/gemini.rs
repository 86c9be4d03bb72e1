// ABOUTME: Google Gemini client for AI-assisted recipe and grocery suggestions
// ABOUTME: Prompts for strict JSON and tolerates markdown-fenced model output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Gemini Client
//!
//! Pass-through adapter to Google's Generative Language API, used for recipe
//! suggestions, grocery suggestions, ingredient translation, and parsing
//! imported recipes into the local format.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with an API key from
//! Google AI Studio. Without it the AI endpoints report
//! `FEATURE_NOT_CONFIGURED` instead of calling out.

use crate::config::GeminiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{NewRecipe, Recipe, RecipeIngredient, RecipeStep};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request timeout for generation calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

/// Content structure for the Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

/// Text part of content
#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

// ============================================================================
// Structured Suggestion Types
// ============================================================================

/// One AI-suggested recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: i64,
    #[serde(default)]
    pub prep_time_minutes: Option<i64>,
    #[serde(default)]
    pub cook_time_minutes: Option<i64>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
}

const fn default_servings() -> i64 {
    4
}

/// Recipe suggestions derived from the current inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSuggestions {
    pub suggestions: Vec<SuggestedRecipe>,
    #[serde(default)]
    pub inventory_used: Vec<String>,
}

/// One suggested grocery purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrocerySuggestion {
    pub item_name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Grocery suggestions derived from inventory and favorite recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrocerySuggestions {
    pub suggestions: Vec<GrocerySuggestion>,
    #[serde(default)]
    pub based_on_recipes: Vec<String>,
    #[serde(default)]
    pub current_inventory: Vec<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Gemini generative API
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from a configuration section with a present API key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is set
    pub fn from_config(config: &GeminiConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("GEMINI_API_KEY environment variable not set"))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            client,
        })
    }

    /// Suggest exactly 3 recipes based on the current inventory
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the API call fails or the model output
    /// cannot be parsed
    #[instrument(skip(self, inventory))]
    pub async fn recipe_suggestions(
        &self,
        inventory: &[String],
        query: Option<&str>,
    ) -> AppResult<RecipeSuggestions> {
        let inventory_str = if inventory.is_empty() {
            "No items in inventory".to_owned()
        } else {
            inventory.join(", ")
        };

        let query_instruction = query.map_or_else(String::new, |q| {
            format!(
                "\nSPECIFIC REQUEST: {q}\n\
                 Focus on recipes that match this request. For example:\n\
                 - If the request mentions a cuisine (Italian, Asian, etc.), suggest dishes from that cuisine\n\
                 - If it mentions a dish type (soup, salad, pasta, etc.), suggest that type of dish\n\
                 - If it mentions dietary needs (vegetarian, low-carb, etc.), respect those constraints\n\
                 - If it mentions time (quick, 30 minutes, etc.), suggest faster recipes\n"
            )
        });

        let prompt = format!(
            r#"You are a helpful cooking assistant. Based on the following inventory items, suggest 3 recipes that can be made.

INVENTORY ITEMS:
{inventory_str}
{query_instruction}
For each recipe, provide:
1. A creative but descriptive name
2. A brief description (1-2 sentences)
3. Number of servings
4. Prep time in minutes
5. Cook time in minutes
6. List of ingredients with amounts and units
7. Step-by-step cooking instructions

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{{
  "suggestions": [
    {{
      "name": "Recipe Name",
      "description": "Brief description of the dish",
      "servings": 4,
      "prep_time_minutes": 15,
      "cook_time_minutes": 30,
      "ingredients": [
        {{"name": "ingredient name", "amount": "2", "unit": "cups", "notes": "diced"}}
      ],
      "steps": [
        {{"step_number": 1, "instruction": "First step..."}}
      ]
    }}
  ],
  "inventory_used": ["item1", "item2"]
}}

Provide exactly 3 recipe suggestions. Use ingredients from the inventory when possible, but you can suggest additional common pantry items if needed."#
        );

        let text = self.generate(&prompt).await?;
        parse_model_json(&text)
    }

    /// Suggest grocery purchases based on inventory and favorite recipes
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the API call fails or the model output
    /// cannot be parsed
    #[instrument(skip(self, inventory, favorites))]
    pub async fn grocery_suggestions(
        &self,
        inventory: &[String],
        favorites: &[Recipe],
        preferences: Option<&str>,
    ) -> AppResult<GrocerySuggestions> {
        let inventory_str = if inventory.is_empty() {
            "No items in inventory".to_owned()
        } else {
            inventory.join(", ")
        };

        let recipes_str = if favorites.is_empty() {
            "No favorite recipes saved".to_owned()
        } else {
            favorites
                .iter()
                .map(|recipe| {
                    let ingredients = recipe
                        .ingredients
                        .iter()
                        .map(|i| i.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("- {}: {ingredients}", recipe.name)
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let pref_str = preferences.map_or_else(String::new, |p| {
            format!("\n\nDietary preferences: {p}")
        });

        let prompt = format!(
            r#"You are a helpful grocery shopping assistant. Based on the current inventory and favorite recipes, suggest items to add to the grocery list.

CURRENT INVENTORY:
{inventory_str}

FAVORITE RECIPES:
{recipes_str}
{pref_str}

Analyze what ingredients are missing to make the favorite recipes, and suggest common staples that might be running low.

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{{
  "suggestions": [
    {{
      "item_name": "item to buy",
      "reason": "needed for Recipe Name, or general reason"
    }}
  ],
  "based_on_recipes": ["Recipe 1", "Recipe 2"],
  "current_inventory": ["item1", "item2"]
}}

Suggest 5-10 practical grocery items. Prioritize ingredients needed for favorite recipes that aren't in inventory."#
        );

        let text = self.generate(&prompt).await?;
        let mut result: GrocerySuggestions = parse_model_json(&text)?;

        // The model occasionally omits the echo fields
        if result.based_on_recipes.is_empty() {
            result.based_on_recipes = favorites.iter().map(|r| r.name.clone()).collect();
        }
        if result.current_inventory.is_empty() {
            result.current_inventory = inventory.to_vec();
        }
        Ok(result)
    }

    /// Translate ingredient names to English for the discovery search
    ///
    /// Falls back to the input names on any failure; translation is an
    /// enhancement, not a requirement.
    #[instrument(skip(self, names))]
    pub async fn translate_ingredients(&self, names: &[String]) -> Vec<String> {
        let list = names.join(", ");
        let prompt = format!(
            r#"Translate the following ingredient names to English for a recipe search API. Keep already-English names unchanged.

INGREDIENTS:
{list}

IMPORTANT: Respond ONLY with a valid JSON array of strings in the same order, e.g. ["milk", "eggs"]."#
        );

        match self.generate(&prompt).await {
            Ok(text) => match parse_model_json::<Vec<String>>(&text) {
                Ok(translated) if translated.len() == names.len() => translated,
                Ok(_) | Err(_) => {
                    warn!("Ingredient translation returned an unusable result, using originals");
                    names.to_vec()
                }
            },
            Err(e) => {
                warn!(error = %e, "Ingredient translation failed, using originals");
                names.to_vec()
            }
        }
    }

    /// Parse an upstream discovery recipe into the local recipe format
    ///
    /// # Errors
    ///
    /// Returns an upstream error if the API call fails or the model output
    /// cannot be parsed
    #[instrument(skip(self, upstream))]
    pub async fn parse_recipe(&self, upstream: &serde_json::Value) -> AppResult<NewRecipe> {
        let upstream_json = serde_json::to_string(upstream)?;
        let prompt = format!(
            r#"Convert the following recipe data into a clean, structured format.

RECIPE DATA:
{upstream_json}

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{{
  "name": "Recipe Name",
  "description": "Brief description, max 500 characters",
  "servings": 4,
  "prep_time_minutes": 15,
  "cook_time_minutes": 30,
  "ingredients": [
    {{"name": "ingredient name", "amount": "2", "unit": "cups", "notes": "diced"}}
  ],
  "steps": [
    {{"step_number": 1, "instruction": "First step..."}}
  ]
}}

Use simple ingredient names suitable for matching against a pantry inventory. Strip any HTML from the instructions."#
        );

        let text = self.generate(&prompt).await?;
        parse_model_json(&text)
    }

    /// Send one prompt and return the model's text output
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![ContentPart {
                    text: prompt.to_owned(),
                }],
            }],
        };

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::external_service("Gemini", format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            AppError::external_service("Gemini", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(AppError::external_service(
                "Gemini",
                format!("API error ({status}): {response_text}"),
            ));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response envelope");
            AppError::external_service("Gemini", format!("Unparseable response: {e}"))
        })?;

        if let Some(error) = gemini_response.error {
            return Err(AppError::external_service("Gemini", error.message));
        }

        gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| AppError::external_service("Gemini", "No content in response"))
    }
}

/// Strip a surrounding markdown code fence, if present
///
/// The model sometimes wraps JSON in ```json ... ``` despite instructions.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some(rest) = trimmed.strip_prefix("```") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    trimmed
}

/// Parse model output as JSON after removing any code fence
fn parse_model_json<T: serde::de::DeserializeOwned>(text: &str) -> AppResult<T> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| {
        AppError::external_service("Gemini", format!("Failed to parse model output: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_json_block() {
        let wrapped = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(wrapped), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_plain_block() {
        let wrapped = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(wrapped), "[1, 2]");
    }

    #[test]
    fn test_strip_code_fences_unfenced() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_model_json_suggestions() {
        let text = r#"```json
{"suggestions": [{"name": "Omelette", "servings": 2, "ingredients": [], "steps": []}], "inventory_used": ["Eggs"]}
```"#;
        let parsed: RecipeSuggestions = parse_model_json(text).unwrap();
        assert_eq!(parsed.suggestions.len(), 1);
        assert_eq!(parsed.suggestions[0].name, "Omelette");
        assert_eq!(parsed.inventory_used, vec!["Eggs"]);
    }

    #[test]
    fn test_parse_model_json_garbage_is_upstream_error() {
        let result: AppResult<RecipeSuggestions> = parse_model_json("Sorry, I cannot help.");
        let error = result.unwrap_err();
        assert_eq!(
            error.code,
            crate::errors::ErrorCode::ExternalServiceError
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = GeminiConfig {
            api_key: None,
            model: "gemini-2.5-flash-lite".to_owned(),
        };
        assert!(GeminiClient::from_config(&config).is_err());
    }
}
