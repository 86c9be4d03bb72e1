// ABOUTME: Database operations for recipes with ingredient and step child rows
// ABOUTME: Handles CRUD, favorite flagging, and inventory availability reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

use crate::errors::{AppError, AppResult};
use crate::models::{
    CanMakeReport, ItemLocation, NewRecipe, Recipe, RecipeIngredient, RecipePatch, RecipeReplace,
    RecipeStep,
};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashSet;

/// Manager for recipe operations
#[derive(Debug, Clone)]
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a manager over the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new recipe with its ingredients and steps
    ///
    /// # Errors
    ///
    /// Returns Validation for an empty name, or an error if the database
    /// operation fails
    pub async fn create(&self, recipe: &NewRecipe) -> AppResult<Recipe> {
        let name = recipe.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Recipe name must not be empty"));
        }

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (
                name, description, servings, prep_time_minutes, cook_time_minutes,
                is_favorite, source_url, image_url, external_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(name)
        .bind(&recipe.description)
        .bind(recipe.servings)
        .bind(recipe.prep_time_minutes)
        .bind(recipe.cook_time_minutes)
        .bind(recipe.is_favorite)
        .bind(&recipe.source_url)
        .bind(&recipe.image_url)
        .bind(recipe.external_id)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;
        let recipe_id = result.last_insert_rowid();

        for (position, ingredient) in recipe.ingredients.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO recipe_ingredients (recipe_id, position, name, amount, unit, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(recipe_id)
            .bind(position as i64)
            .bind(&ingredient.name)
            .bind(&ingredient.amount)
            .bind(&ingredient.unit)
            .bind(&ingredient.notes)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add ingredient: {e}")))?;
        }

        for step in &recipe.steps {
            sqlx::query(
                "INSERT INTO recipe_steps (recipe_id, step_number, instruction) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(step.step_number)
            .bind(&step.instruction)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add step: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        self.get(recipe_id)
            .await?
            .ok_or_else(|| AppError::internal("Created recipe disappeared"))
    }

    /// Get a recipe by ID with ingredients and steps
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, servings, prep_time_minutes, cook_time_minutes,
                   is_favorite, source_url, image_url, external_id, created_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        match row {
            Some(row) => {
                let mut recipe = row_to_recipe(&row)?;
                recipe.ingredients = self.ingredients_for(recipe.id).await?;
                recipe.steps = self.steps_for(recipe.id).await?;
                Ok(Some(recipe))
            }
            None => Ok(None),
        }
    }

    /// List recipes, newest first, optionally favorites only
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, favorites_only: bool) -> AppResult<Vec<Recipe>> {
        let base = r"
            SELECT id, name, description, servings, prep_time_minutes, cook_time_minutes,
                   is_favorite, source_url, image_url, external_id, created_at
            FROM recipes
        ";
        let rows = if favorites_only {
            sqlx::query(&format!(
                "{base} WHERE is_favorite = 1 ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query(&format!("{base} ORDER BY created_at DESC, id DESC"))
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut recipe = row_to_recipe(row)?;
            recipe.ingredients = self.ingredients_for(recipe.id).await?;
            recipe.steps = self.steps_for(recipe.id).await?;
            recipes.push(recipe);
        }
        Ok(recipes)
    }

    /// Update a recipe's metadata; ingredients and steps are untouched
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn update_metadata(&self, recipe_id: i64, patch: &RecipePatch) -> AppResult<Recipe> {
        let existing = self
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_input("Recipe name must not be empty"));
            }
        }

        sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, description = $2, servings = $3,
                prep_time_minutes = $4, cook_time_minutes = $5, is_favorite = $6
            WHERE id = $7
            ",
        )
        .bind(patch.name.as_deref().map_or(existing.name.as_str(), str::trim))
        .bind(patch.description.clone().or_else(|| existing.description.clone()))
        .bind(patch.servings.unwrap_or(existing.servings))
        .bind(patch.prep_time_minutes.or(existing.prep_time_minutes))
        .bind(patch.cook_time_minutes.or(existing.cook_time_minutes))
        .bind(patch.is_favorite.unwrap_or(existing.is_favorite))
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        self.get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    /// Full update; provided ingredient/step lists replace the existing rows
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn replace(&self, recipe_id: i64, update: &RecipeReplace) -> AppResult<Recipe> {
        let existing = self
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_input("Recipe name must not be empty"));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, description = $2, servings = $3,
                prep_time_minutes = $4, cook_time_minutes = $5, is_favorite = $6
            WHERE id = $7
            ",
        )
        .bind(update.name.as_deref().map_or(existing.name.as_str(), str::trim))
        .bind(update.description.clone().or_else(|| existing.description.clone()))
        .bind(update.servings.unwrap_or(existing.servings))
        .bind(update.prep_time_minutes.or(existing.prep_time_minutes))
        .bind(update.cook_time_minutes.or(existing.cook_time_minutes))
        .bind(update.is_favorite.unwrap_or(existing.is_favorite))
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if let Some(ingredients) = &update.ingredients {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to clear ingredients: {e}")))?;

            for (position, ingredient) in ingredients.iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO recipe_ingredients (recipe_id, position, name, amount, unit, notes)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ",
                )
                .bind(recipe_id)
                .bind(position as i64)
                .bind(&ingredient.name)
                .bind(&ingredient.amount)
                .bind(&ingredient.unit)
                .bind(&ingredient.notes)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to add ingredient: {e}")))?;
            }
        }

        if let Some(steps) = &update.steps {
            sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to clear steps: {e}")))?;

            for step in steps {
                sqlx::query(
                    "INSERT INTO recipe_steps (recipe_id, step_number, instruction) VALUES ($1, $2, $3)",
                )
                .bind(recipe_id)
                .bind(step.step_number)
                .bind(&step.instruction)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to add step: {e}")))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        self.get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    /// Delete a recipe; child rows are removed by the cascade
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn delete(&self, recipe_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }
        Ok(())
    }

    /// Flip a recipe's favorite flag
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn toggle_favorite(&self, recipe_id: i64) -> AppResult<Recipe> {
        let result = sqlx::query("UPDATE recipes SET is_favorite = NOT is_favorite WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to toggle favorite: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {recipe_id}")));
        }

        self.get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    /// Report which of a recipe's ingredients are in the current inventory
    ///
    /// Matching is a case-insensitive comparison of trimmed names; there is
    /// no fuzzy matching or unit conversion.
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn can_make(&self, recipe_id: i64) -> AppResult<CanMakeReport> {
        let recipe = self
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

        let rows = sqlx::query("SELECT name FROM items WHERE location = $1")
            .bind(ItemLocation::Inventory.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list inventory: {e}")))?;

        let inventory: HashSet<String> = rows
            .iter()
            .map(|row| row.get::<String, _>("name").trim().to_lowercase())
            .collect();

        let mut available = Vec::new();
        let mut missing = Vec::new();
        for ingredient in &recipe.ingredients {
            if inventory.contains(&ingredient.name.trim().to_lowercase()) {
                available.push(ingredient.name.clone());
            } else {
                missing.push(ingredient.name.clone());
            }
        }

        Ok(CanMakeReport::new(recipe_id, available, missing))
    }

    /// Ingredients of one recipe in insertion order
    async fn ingredients_for(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredient>> {
        let rows = sqlx::query(
            r"
            SELECT name, amount, unit, notes
            FROM recipe_ingredients
            WHERE recipe_id = $1
            ORDER BY position
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        Ok(rows.iter().map(row_to_ingredient).collect())
    }

    /// Steps of one recipe ordered by step number
    async fn steps_for(&self, recipe_id: i64) -> AppResult<Vec<RecipeStep>> {
        let rows = sqlx::query(
            r"
            SELECT step_number, instruction
            FROM recipe_steps
            WHERE recipe_id = $1
            ORDER BY step_number
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list steps: {e}")))?;

        Ok(rows.iter().map(row_to_step).collect())
    }
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| AppError::internal(format!("Invalid timestamp: {e}")))?
        .with_timezone(&Utc);
    let is_favorite: i64 = row.get("is_favorite");

    Ok(Recipe {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        servings: row.get("servings"),
        prep_time_minutes: row.get("prep_time_minutes"),
        cook_time_minutes: row.get("cook_time_minutes"),
        is_favorite: is_favorite == 1,
        source_url: row.get("source_url"),
        image_url: row.get("image_url"),
        external_id: row.get("external_id"),
        created_at,
        ingredients: Vec::new(),
        steps: Vec::new(),
    })
}

fn row_to_ingredient(row: &SqliteRow) -> RecipeIngredient {
    RecipeIngredient {
        name: row.get("name"),
        amount: row.get("amount"),
        unit: row.get("unit"),
        notes: row.get("notes"),
    }
}

fn row_to_step(row: &SqliteRow) -> RecipeStep {
    RecipeStep {
        step_number: row.get("step_number"),
        instruction: row.get("instruction"),
    }
}
