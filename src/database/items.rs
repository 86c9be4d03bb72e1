// ABOUTME: Database operations for items and their barcodes
// ABOUTME: Handles barcode resolution, location transitions, and ranked search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

use crate::errors::{AppError, AppResult};
use crate::models::{AssociateTarget, Barcode, BarcodeLookup, Item, ItemLocation};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;

/// Manager for item and barcode operations
///
/// Location transitions are total: every operation sets the target value
/// directly, so any state is reachable from any other and repeating a
/// transition is a no-op.
#[derive(Debug, Clone)]
pub struct ItemsManager {
    pool: SqlitePool,
}

impl ItemsManager {
    /// Create a manager over the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a scanned barcode to its owning item
    ///
    /// An unregistered code returns [`BarcodeLookup::Unknown`], not an error,
    /// so the caller can prompt for item creation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn lookup_barcode(&self, code: &str) -> AppResult<BarcodeLookup> {
        let row = sqlx::query("SELECT item_id FROM barcodes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up barcode: {e}")))?;

        match row {
            Some(row) => {
                let item_id: i64 = row.get("item_id");
                let item = self
                    .get(item_id)
                    .await?
                    .ok_or_else(|| AppError::internal("Barcode references a missing item"))?;
                Ok(BarcodeLookup::Known(item))
            }
            None => Ok(BarcodeLookup::Unknown),
        }
    }

    /// Bind a barcode to an existing item or to a newly created one
    ///
    /// Re-binding a code to the item it already belongs to is idempotent and
    /// returns the item unchanged; binding it anywhere else is a conflict.
    ///
    /// # Errors
    ///
    /// Returns Conflict if the code is bound to a different item, NotFound
    /// for an unknown item id, and Validation for an empty code or name
    pub async fn associate_barcode(
        &self,
        code: &str,
        target: &AssociateTarget,
    ) -> AppResult<Item> {
        if code.trim().is_empty() {
            return Err(AppError::invalid_input("Barcode code must not be empty"));
        }

        if let Some(existing) = self.find_barcode(code).await? {
            // Idempotent only when the code already points at the requested item
            if let AssociateTarget::Existing { item_id } = target {
                if existing.item_id == *item_id {
                    return self
                        .get(existing.item_id)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("Item {item_id}")));
                }
            }
            let owner = self.get(existing.item_id).await?;
            let owner_name = owner.map_or_else(|| "unknown".to_owned(), |item| item.name);
            return Err(AppError::conflict(format!(
                "Barcode already associated with item: {owner_name}"
            ))
            .with_details(serde_json::json!({ "barcode": code })));
        }

        match target {
            AssociateTarget::Existing { item_id } => {
                let item = self
                    .get(*item_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Item {item_id}")))?;

                sqlx::query("INSERT INTO barcodes (code, item_id) VALUES ($1, $2)")
                    .bind(code)
                    .bind(item.id)
                    .execute(&self.pool)
                    .await?;

                self.get(item.id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Item {item_id}")))
            }
            AssociateTarget::NewItem { name, location } => {
                self.create(name, *location, Some(code)).await
            }
        }
    }

    /// Create a new item, optionally binding a barcode in the same transaction
    ///
    /// # Errors
    ///
    /// Returns Conflict on a duplicate name or already-bound barcode, and
    /// Validation for an empty name
    pub async fn create(
        &self,
        name: &str,
        location: ItemLocation,
        barcode: Option<&str>,
    ) -> AppResult<Item> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Item name must not be empty"));
        }

        if let Some(existing) = self.find_by_name(name).await? {
            return Err(AppError::conflict(format!(
                "Item with name '{}' already exists",
                existing.name
            )));
        }

        if let Some(code) = barcode {
            if code.trim().is_empty() {
                return Err(AppError::invalid_input("Barcode code must not be empty"));
            }
            if let Some(existing) = self.find_barcode(code).await? {
                let owner = self.get(existing.item_id).await?;
                let owner_name = owner.map_or_else(|| "unknown".to_owned(), |item| item.name);
                return Err(AppError::conflict(format!(
                    "Barcode already associated with item: {owner_name}"
                )));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query("INSERT INTO items (name, location) VALUES ($1, $2)")
            .bind(name)
            .bind(location.as_str())
            .execute(&mut *tx)
            .await?;
        let item_id = result.last_insert_rowid();

        if let Some(code) = barcode {
            sqlx::query("INSERT INTO barcodes (code, item_id) VALUES ($1, $2)")
                .bind(code)
                .bind(item_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))?;

        self.get(item_id)
            .await?
            .ok_or_else(|| AppError::internal("Created item disappeared"))
    }

    /// Get an item by ID with its barcodes
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, item_id: i64) -> AppResult<Option<Item>> {
        let row = sqlx::query("SELECT id, name, location FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get item: {e}")))?;

        match row {
            Some(row) => {
                let mut item = row_to_item(&row);
                item.barcodes = self.barcodes_for(item.id).await?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    /// List items, optionally filtered by location, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, location: Option<ItemLocation>) -> AppResult<Vec<Item>> {
        let rows = match location {
            Some(location) => {
                sqlx::query(
                    "SELECT id, name, location FROM items WHERE location = $1 ORDER BY name",
                )
                .bind(location.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT id, name, location FROM items ORDER BY name")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list items: {e}")))?;

        self.attach_barcodes(rows.iter().map(row_to_item).collect())
            .await
    }

    /// Update an item's name and/or location
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id and Conflict on a duplicate name
    pub async fn update(
        &self,
        item_id: i64,
        name: Option<&str>,
        location: Option<ItemLocation>,
    ) -> AppResult<Item> {
        let item = self
            .get(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id}")))?;

        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::invalid_input("Item name must not be empty"));
            }
            if let Some(existing) = self.find_by_name(name).await? {
                if existing.id != item.id {
                    return Err(AppError::conflict(format!(
                        "Item with name '{name}' already exists"
                    )));
                }
            }
            sqlx::query("UPDATE items SET name = $1 WHERE id = $2")
                .bind(name)
                .bind(item.id)
                .execute(&self.pool)
                .await?;
        }

        if let Some(location) = location {
            self.set_location(item.id, location).await?;
        }

        self.get(item.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id}")))
    }

    /// Delete an item; its barcodes are removed by the cascade
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn delete(&self, item_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete item: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Item {item_id}")));
        }
        Ok(())
    }

    /// Set an item's location directly; idempotent
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn set_location(&self, item_id: i64, location: ItemLocation) -> AppResult<Item> {
        let result = sqlx::query("UPDATE items SET location = $1 WHERE id = $2")
            .bind(location.as_str())
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to move item: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Item {item_id}")));
        }

        self.get(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {item_id}")))
    }

    /// Move an item to inventory (it is now at home)
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn move_to_inventory(&self, item_id: i64) -> AppResult<Item> {
        self.set_location(item_id, ItemLocation::Inventory).await
    }

    /// Move an item to the grocery list (it needs restocking)
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn move_to_grocery(&self, item_id: i64) -> AppResult<Item> {
        self.set_location(item_id, ItemLocation::Grocery).await
    }

    /// Archive an item: off both lists, but kept for future scans
    ///
    /// # Errors
    ///
    /// Returns NotFound for an unknown id
    pub async fn archive(&self, item_id: i64) -> AppResult<Item> {
        self.set_location(item_id, ItemLocation::Archived).await
    }

    /// Case-insensitive substring search over item names
    ///
    /// Exact name matches rank first, then prefix matches, then the rest,
    /// with ties broken by insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn search(&self, query: &str) -> AppResult<Vec<Item>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, location FROM items
            WHERE name LIKE '%' || $1 || '%'
            ORDER BY CASE
                WHEN lower(name) = lower($1) THEN 0
                WHEN lower(name) LIKE lower($1) || '%' THEN 1
                ELSE 2
            END, id
            ",
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to search items: {e}")))?;

        self.attach_barcodes(rows.iter().map(row_to_item).collect())
            .await
    }

    /// Names of all items currently in inventory, for availability checks
    /// and AI context
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn inventory_names(&self) -> AppResult<Vec<String>> {
        let rows =
            sqlx::query("SELECT name FROM items WHERE location = $1 ORDER BY name")
                .bind(ItemLocation::Inventory.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to list inventory: {e}")))?;

        Ok(rows.iter().map(|row| row.get("name")).collect())
    }

    /// Find an item by exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Item>> {
        let row = sqlx::query("SELECT id, name, location FROM items WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to find item by name: {e}")))?;

        Ok(row.map(|row| row_to_item(&row)))
    }

    /// Find a barcode row by code
    async fn find_barcode(&self, code: &str) -> AppResult<Option<Barcode>> {
        let row = sqlx::query("SELECT id, code, item_id FROM barcodes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to find barcode: {e}")))?;

        Ok(row.map(|row| row_to_barcode(&row)))
    }

    /// Barcodes owned by one item
    async fn barcodes_for(&self, item_id: i64) -> AppResult<Vec<Barcode>> {
        let rows =
            sqlx::query("SELECT id, code, item_id FROM barcodes WHERE item_id = $1 ORDER BY id")
                .bind(item_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to list barcodes: {e}")))?;

        Ok(rows.iter().map(row_to_barcode).collect())
    }

    /// Fill in the barcodes for a batch of items with a single query
    async fn attach_barcodes(&self, mut items: Vec<Item>) -> AppResult<Vec<Item>> {
        if items.is_empty() {
            return Ok(items);
        }

        let rows = sqlx::query("SELECT id, code, item_id FROM barcodes ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list barcodes: {e}")))?;

        let mut by_item: HashMap<i64, Vec<Barcode>> = HashMap::new();
        for row in &rows {
            let barcode = row_to_barcode(row);
            by_item.entry(barcode.item_id).or_default().push(barcode);
        }

        for item in &mut items {
            if let Some(barcodes) = by_item.remove(&item.id) {
                item.barcodes = barcodes;
            }
        }
        Ok(items)
    }
}

fn row_to_item(row: &SqliteRow) -> Item {
    let location_str: String = row.get("location");
    Item {
        id: row.get("id"),
        name: row.get("name"),
        location: ItemLocation::parse(&location_str),
        barcodes: Vec::new(),
    }
}

fn row_to_barcode(row: &SqliteRow) -> Barcode {
    Barcode {
        id: row.get("id"),
        code: row.get("code"),
        item_id: row.get("item_id"),
    }
}
