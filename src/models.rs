// ABOUTME: Common data models for items, barcodes, and recipes
// ABOUTME: Defines the location state enum and typed lookup/association results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Domain models shared across the database, route, and external layers.
//!
//! Items carry exactly one [`ItemLocation`] at all times; every transition is
//! a direct set to the target value, so any state is reachable from any other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an item currently resides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemLocation {
    /// Item is at home
    Inventory,
    /// Item needs to be restocked
    Grocery,
    /// Item exists but is tracked in neither list; kept for future barcode
    /// recognition
    #[default]
    Archived,
}

impl ItemLocation {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Grocery => "grocery",
            Self::Archived => "archived",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "inventory" => Self::Inventory,
            "grocery" => Self::Grocery,
            _ => Self::Archived,
        }
    }
}

/// A trackable household good with a name and a location state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: i64,
    /// Display name, unique across all items
    pub name: String,
    /// Current location state
    pub location: ItemLocation,
    /// Barcodes bound to this item (zero or more)
    #[serde(default)]
    pub barcodes: Vec<Barcode>,
}

/// A scannable code bound to exactly one item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barcode {
    /// Unique identifier
    pub id: i64,
    /// The scanned code string (UPC, EAN, etc.), unique across all barcodes
    pub code: String,
    /// Owning item
    pub item_id: i64,
}

/// Result of resolving a scanned barcode
///
/// An unknown code is a normal outcome, not an error; the caller is expected
/// to prompt for item creation.
#[derive(Debug, Clone)]
pub enum BarcodeLookup {
    /// The code is bound to an item
    Known(Item),
    /// The code has never been registered
    Unknown,
}

/// Target of a barcode association
#[derive(Debug, Clone)]
pub enum AssociateTarget {
    /// Bind the code to an existing item
    Existing { item_id: i64 },
    /// Create a new item and bind the code to it
    NewItem {
        name: String,
        location: ItemLocation,
    },
}

/// A named collection of ingredients and steps, optionally favorited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Short description of the dish
    pub description: Option<String>,
    /// Number of servings the recipe yields
    pub servings: i64,
    /// Preparation time in minutes
    pub prep_time_minutes: Option<i64>,
    /// Cooking time in minutes
    pub cook_time_minutes: Option<i64>,
    /// Whether the recipe is marked as favorite
    pub is_favorite: bool,
    /// URL of the page the recipe came from, when imported
    pub source_url: Option<String>,
    /// Image URL, when imported
    pub image_url: Option<String>,
    /// Upstream recipe id, when imported from the discovery API
    pub external_id: Option<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Ingredients in insertion order
    pub ingredients: Vec<RecipeIngredient>,
    /// Steps ordered by step number
    pub steps: Vec<RecipeStep>,
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient name, matched against inventory item names
    pub name: String,
    /// Free-form amount, e.g. "2" or "1/2"
    pub amount: Option<String>,
    /// Unit for the amount, e.g. "cups"
    pub unit: Option<String>,
    /// Preparation notes, e.g. "diced"
    pub notes: Option<String>,
}

/// One instruction step of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    /// 1-based ordering of the step
    pub step_number: i64,
    /// The instruction text
    pub instruction: String,
}

/// Payload for creating a recipe, from manual entry or discovery import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
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
    pub is_favorite: bool,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
}

const fn default_servings() -> i64 {
    4
}

/// Partial update of a recipe's metadata; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub servings: Option<i64>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub is_favorite: Option<bool>,
}

/// Full update of a recipe; provided ingredient/step lists replace the
/// existing ones wholesale
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeReplace {
    pub name: Option<String>,
    pub description: Option<String>,
    pub servings: Option<i64>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub is_favorite: Option<bool>,
    pub ingredients: Option<Vec<RecipeIngredient>>,
    pub steps: Option<Vec<RecipeStep>>,
}

/// Ingredient availability of a recipe against the current inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanMakeReport {
    /// The recipe this report is for
    pub recipe_id: i64,
    /// Total number of ingredients on the recipe
    pub total_ingredients: usize,
    /// Ingredient names present in the inventory
    pub available: Vec<String>,
    /// Ingredient names missing from the inventory
    pub missing: Vec<String>,
    /// available / total, 0.0 for a recipe with no ingredients
    pub coverage: f64,
}

impl CanMakeReport {
    /// Build a report from matched and missing ingredient name lists
    #[must_use]
    pub fn new(recipe_id: i64, available: Vec<String>, missing: Vec<String>) -> Self {
        let total_ingredients = available.len() + missing.len();
        let coverage = if total_ingredients == 0 {
            0.0
        } else {
            available.len() as f64 / total_ingredients as f64
        };
        Self {
            recipe_id,
            total_ingredients,
            available,
            missing,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_roundtrip() {
        for location in [
            ItemLocation::Inventory,
            ItemLocation::Grocery,
            ItemLocation::Archived,
        ] {
            assert_eq!(ItemLocation::parse(location.as_str()), location);
        }
    }

    #[test]
    fn test_location_wire_format() {
        let json = serde_json::to_string(&ItemLocation::Grocery).unwrap();
        assert_eq!(json, "\"grocery\"");
        let parsed: ItemLocation = serde_json::from_str("\"inventory\"").unwrap();
        assert_eq!(parsed, ItemLocation::Inventory);
    }

    #[test]
    fn test_location_default_is_archived() {
        assert_eq!(ItemLocation::default(), ItemLocation::Archived);
        assert_eq!(ItemLocation::parse("neither"), ItemLocation::Archived);
    }

    #[test]
    fn test_can_make_coverage() {
        let report = CanMakeReport::new(
            1,
            vec!["eggs".to_owned()],
            vec!["milk".to_owned(), "flour".to_owned()],
        );
        assert_eq!(report.total_ingredients, 3);
        assert!((report.coverage - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_can_make_empty_recipe() {
        let report = CanMakeReport::new(1, vec![], vec![]);
        assert_eq!(report.total_ingredients, 0);
        assert!((report.coverage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_recipe_defaults() {
        let recipe: NewRecipe = serde_json::from_str(r#"{"name": "Toast"}"#).unwrap();
        assert_eq!(recipe.servings, 4);
        assert!(!recipe.is_favorite);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
    }
}
