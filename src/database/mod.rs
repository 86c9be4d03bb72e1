// ABOUTME: Database management with schema migration for the SQLite store
// ABOUTME: Owns the connection pool and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Database access layer
//!
//! [`Database`] owns the `SQLite` pool and creates the schema on startup.
//! Domain operations live on [`ItemsManager`] and [`RecipesManager`], which
//! share the pool.

use crate::errors::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Item and barcode state-transition operations
pub mod items;

/// Recipe storage and ingredient-availability operations
pub mod recipes;

pub use items::ItemsManager;
pub use recipes::RecipesManager;

/// Database handle wrapping the shared connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run schema migration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or any migration statement fails
    pub async fn new(connection_string: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        info!("Database schema ready");

        Ok(database)
    }

    /// Access the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create an items manager sharing this pool
    #[must_use]
    pub fn items(&self) -> ItemsManager {
        ItemsManager::new(self.pool.clone())
    }

    /// Create a recipes manager sharing this pool
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Create all tables and indexes
    async fn migrate(&self) -> AppResult<()> {
        self.migrate_items().await?;
        self.migrate_recipes().await?;
        Ok(())
    }

    /// Create items and barcodes tables
    async fn migrate_items(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                location TEXT NOT NULL DEFAULT 'archived'
                    CHECK (location IN ('inventory', 'grocery', 'archived'))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS barcodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_location ON items(location)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_barcodes_item_id ON barcodes(item_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create recipes, recipe_ingredients, and recipe_steps tables
    async fn migrate_recipes(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                servings INTEGER NOT NULL DEFAULT 4,
                prep_time_minutes INTEGER,
                cook_time_minutes INTEGER,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                source_url TEXT,
                image_url TEXT,
                external_id INTEGER,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                amount TEXT,
                unit TEXT,
                notes TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_steps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                step_number INTEGER NOT NULL,
                instruction TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_steps_recipe ON recipe_steps(recipe_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
