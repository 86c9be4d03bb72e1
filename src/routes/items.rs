// ABOUTME: Route handlers for items, barcodes, and list views
// ABOUTME: Exposes barcode lookup/association, CRUD, transitions, and search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Item and barcode routes
//!
//! The scanner client drives these endpoints: look up a code, register it
//! against a new or existing item, and move items between the three
//! locations.

use super::ServerResources;
use crate::errors::AppError;
use crate::models::{AssociateTarget, BarcodeLookup, Item, ItemLocation};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response for a barcode lookup
///
/// An unknown code is a successful response with `found: false`, so the
/// scanner can prompt for item creation instead of handling an error.
#[derive(Debug, Serialize, Deserialize)]
pub struct BarcodeLookupResponse {
    /// Whether the code is registered
    pub found: bool,
    /// The code that was looked up
    pub barcode: String,
    /// The owning item, when found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

/// Request body for associating a barcode
///
/// Either binds the code to an existing item by id, or creates a new item
/// and binds the code to it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AssociateBarcodeBody {
    /// Bind to an existing item
    Existing { barcode: String, item_id: i64 },
    /// Create a new item and bind to it
    NewItem {
        barcode: String,
        name: String,
        #[serde(default)]
        location: ItemLocation,
    },
}

impl AssociateBarcodeBody {
    /// Split into the scanned code and the typed association target
    fn into_parts(self) -> (String, AssociateTarget) {
        match self {
            Self::Existing { barcode, item_id } => {
                (barcode, AssociateTarget::Existing { item_id })
            }
            Self::NewItem {
                barcode,
                name,
                location,
            } => (barcode, AssociateTarget::NewItem { name, location }),
        }
    }
}

/// Request body for creating an item
#[derive(Debug, Deserialize)]
pub struct CreateItemBody {
    /// Item name, unique across all items
    pub name: String,
    /// Initial location; archived when omitted
    #[serde(default)]
    pub location: ItemLocation,
    /// Optional barcode to bind on creation
    #[serde(default)]
    pub barcode: Option<String>,
}

/// Request body for updating an item
#[derive(Debug, Deserialize, Default)]
pub struct UpdateItemBody {
    /// New name (if provided)
    pub name: Option<String>,
    /// New location (if provided)
    pub location: Option<ItemLocation>,
}

/// Query parameters for listing items
#[derive(Debug, Deserialize, Default)]
pub struct ListItemsQuery {
    /// Filter by location
    pub location: Option<ItemLocation>,
}

/// Query parameters for searching items
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string
    pub q: String,
}

/// Count-and-items view of one location's list
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemListResponse {
    /// Number of items in the list
    pub count: usize,
    /// The items, ordered by name
    pub items: Vec<Item>,
}

/// Response for a deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: i64,
}

/// Items routes handler
pub struct ItemsRoutes;

impl ItemsRoutes {
    /// Create all item and barcode routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/barcode/:code", get(Self::handle_lookup_barcode))
            .route("/api/barcode/associate", post(Self::handle_associate))
            .route("/api/items", get(Self::handle_list))
            .route("/api/items", post(Self::handle_create))
            .route("/api/items/:id", get(Self::handle_get))
            .route("/api/items/:id", patch(Self::handle_update))
            .route("/api/items/:id", delete(Self::handle_delete))
            .route(
                "/api/items/:id/to-inventory",
                post(Self::handle_move_to_inventory),
            )
            .route(
                "/api/items/:id/to-grocery",
                post(Self::handle_move_to_grocery),
            )
            .route("/api/items/:id/archive", post(Self::handle_archive))
            .route("/api/inventory", get(Self::handle_inventory))
            .route("/api/grocery", get(Self::handle_grocery))
            .route("/api/search", get(Self::handle_search))
            .with_state(resources)
    }

    /// Handle GET /api/barcode/:code - Resolve a scanned barcode
    async fn handle_lookup_barcode(
        State(resources): State<Arc<ServerResources>>,
        Path(code): Path<String>,
    ) -> Result<Response, AppError> {
        let lookup = resources.database.items().lookup_barcode(&code).await?;

        let response = match lookup {
            BarcodeLookup::Known(item) => BarcodeLookupResponse {
                found: true,
                barcode: code,
                item: Some(item),
            },
            BarcodeLookup::Unknown => BarcodeLookupResponse {
                found: false,
                barcode: code,
                item: None,
            },
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/barcode/associate - Bind a code to an item
    async fn handle_associate(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<AssociateBarcodeBody>,
    ) -> Result<Response, AppError> {
        let (code, target) = body.into_parts();
        let item = resources
            .database
            .items()
            .associate_barcode(&code, &target)
            .await?;

        Ok((StatusCode::OK, Json(item)).into_response())
    }

    /// Handle GET /api/items - List items, optionally filtered by location
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListItemsQuery>,
    ) -> Result<Response, AppError> {
        let items = resources.database.items().list(query.location).await?;
        Ok((StatusCode::OK, Json(items)).into_response())
    }

    /// Handle POST /api/items - Create a new item
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateItemBody>,
    ) -> Result<Response, AppError> {
        let item = resources
            .database
            .items()
            .create(&body.name, body.location, body.barcode.as_deref())
            .await?;

        Ok((StatusCode::CREATED, Json(item)).into_response())
    }

    /// Handle GET /api/items/:id - Get a specific item
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let item = resources
            .database
            .items()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {id}")))?;

        Ok((StatusCode::OK, Json(item)).into_response())
    }

    /// Handle PATCH /api/items/:id - Update name and/or location
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
        Json(body): Json<UpdateItemBody>,
    ) -> Result<Response, AppError> {
        let item = resources
            .database
            .items()
            .update(id, body.name.as_deref(), body.location)
            .await?;

        Ok((StatusCode::OK, Json(item)).into_response())
    }

    /// Handle DELETE /api/items/:id - Delete an item and its barcodes
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        resources.database.items().delete(id).await?;
        Ok((StatusCode::OK, Json(DeleteResponse { deleted: true, id })).into_response())
    }

    /// Handle POST /api/items/:id/to-inventory
    async fn handle_move_to_inventory(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let item = resources.database.items().move_to_inventory(id).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    /// Handle POST /api/items/:id/to-grocery
    async fn handle_move_to_grocery(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let item = resources.database.items().move_to_grocery(id).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    /// Handle POST /api/items/:id/archive
    async fn handle_archive(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let item = resources.database.items().archive(id).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    /// Handle GET /api/inventory - Items currently at home
    async fn handle_inventory(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let items = resources
            .database
            .items()
            .list(Some(ItemLocation::Inventory))
            .await?;

        let response = ItemListResponse {
            count: items.len(),
            items,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/grocery - Items on the grocery list
    async fn handle_grocery(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let items = resources
            .database
            .items()
            .list(Some(ItemLocation::Grocery))
            .await?;

        let response = ItemListResponse {
            count: items.len(),
            items,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/search?q= - Ranked name search
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<SearchQuery>,
    ) -> Result<Response, AppError> {
        let items = resources.database.items().search(&query.q).await?;
        Ok((StatusCode::OK, Json(items)).into_response())
    }
}
