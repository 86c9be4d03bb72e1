// ABOUTME: HTTP-level tests for the Pantry Server routes
// ABOUTME: Exercises the scanner workflow, error statuses, and unconfigured AI endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

#![allow(missing_docs, clippy::unwrap_used)]

mod helpers;

use helpers::axum_test::AxumTestRequest;
use pantry_server::config::ServerConfig;
use pantry_server::database::Database;
use pantry_server::routes::{self, ServerResources};
use std::sync::Arc;

/// Build the full application router over a fresh in-memory database,
/// with no AI keys configured
async fn create_test_app() -> axum::Router {
    let database = Database::new("sqlite::memory:").await.unwrap();
    let config = ServerConfig::default();
    let resources = Arc::new(ServerResources::new(database, config).unwrap());
    routes::router(resources)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = AxumTestRequest::get("/api/health").send(app).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["gemini_configured"], false);
    assert_eq!(body["spoonacular_configured"], false);
}

// ============================================================================
// Scanner Workflow
// ============================================================================

#[tokio::test]
async fn test_scan_unknown_then_register_then_restock() {
    let app = create_test_app().await;

    // Scan an unknown code: not an error, found=false
    let response = AxumTestRequest::get("/api/barcode/012345678901")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["found"], false);
    assert_eq!(body["barcode"], "012345678901");
    assert!(body.get("item").is_none());

    // Client creates "Milk" bound to that code on the grocery list
    let response = AxumTestRequest::post("/api/barcode/associate")
        .json(&serde_json::json!({
            "barcode": "012345678901",
            "name": "Milk",
            "location": "grocery"
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let item: serde_json::Value = response.json();
    let item_id = item["id"].as_i64().unwrap();
    assert_eq!(item["location"], "grocery");

    // The grocery list shows one item with the scanned barcode
    let response = AxumTestRequest::get("/api/grocery").send(app.clone()).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["name"], "Milk");
    assert_eq!(body["items"][0]["barcodes"][0]["code"], "012345678901");

    // Scanning again in inventory mode: the code resolves, the client moves
    // the item to inventory
    let response = AxumTestRequest::get("/api/barcode/012345678901")
        .send(app.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["found"], true);
    assert_eq!(body["item"]["id"], item_id);

    let response = AxumTestRequest::post(&format!("/api/items/{item_id}/to-inventory"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let item: serde_json::Value = response.json();
    assert_eq!(item["location"], "inventory");

    // The grocery list is empty again, inventory has the item
    let response = AxumTestRequest::get("/api/grocery").send(app.clone()).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 0);

    let response = AxumTestRequest::get("/api/inventory").send(app).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["name"], "Milk");
}

#[tokio::test]
async fn test_associate_with_existing_item_by_id() {
    let app = create_test_app().await;

    let response = AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Milk", "barcode": "111"}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    let item: serde_json::Value = response.json();
    let item_id = item["id"].as_i64().unwrap();

    let response = AxumTestRequest::post("/api/barcode/associate")
        .json(&serde_json::json!({"barcode": "222", "item_id": item_id}))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let item: serde_json::Value = response.json();
    assert_eq!(item["barcodes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_associate_conflicting_code_is_409() {
    let app = create_test_app().await;

    AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Milk", "barcode": "111"}))
        .send(app.clone())
        .await;
    let response = AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Cream"}))
        .send(app.clone())
        .await;
    let cream: serde_json::Value = response.json();

    let response = AxumTestRequest::post("/api/barcode/associate")
        .json(&serde_json::json!({"barcode": "111", "item_id": cream["id"]}))
        .send(app)
        .await;
    assert_eq!(response.status(), 409);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_ALREADY_EXISTS");
    assert!(body["error"]["message"].as_str().unwrap().contains("Milk"));
}

// ============================================================================
// Item CRUD over HTTP
// ============================================================================

#[tokio::test]
async fn test_create_item_duplicate_name_is_409() {
    let app = create_test_app().await;

    AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Milk"}))
        .send(app.clone())
        .await;
    let response = AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Milk"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_create_item_empty_name_is_400() {
    let app = create_test_app().await;
    let response = AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "  "}))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_get_unknown_item_is_404() {
    let app = create_test_app().await;
    let response = AxumTestRequest::get("/api/items/99999").send(app).await;

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_patch_item_location() {
    let app = create_test_app().await;

    let response = AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Milk", "location": "inventory"}))
        .send(app.clone())
        .await;
    let item: serde_json::Value = response.json();
    let item_id = item["id"].as_i64().unwrap();

    let response = AxumTestRequest::patch(&format!("/api/items/{item_id}"))
        .json(&serde_json::json!({"location": "archived"}))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    let item: serde_json::Value = response.json();
    assert_eq!(item["location"], "archived");
}

#[tokio::test]
async fn test_delete_item_frees_barcode() {
    let app = create_test_app().await;

    let response = AxumTestRequest::post("/api/items")
        .json(&serde_json::json!({"name": "Milk", "barcode": "111"}))
        .send(app.clone())
        .await;
    let item: serde_json::Value = response.json();
    let item_id = item["id"].as_i64().unwrap();

    let response = AxumTestRequest::delete(&format!("/api/items/{item_id}"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted"], true);

    let response = AxumTestRequest::get("/api/barcode/111").send(app).await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["found"], false);
}

#[tokio::test]
async fn test_search_endpoint_ranks_exact_first() {
    let app = create_test_app().await;

    for name in ["Whole Milk", "Milk", "milk powder"] {
        AxumTestRequest::post("/api/items")
            .json(&serde_json::json!({"name": name}))
            .send(app.clone())
            .await;
    }

    let response = AxumTestRequest::get("/api/search?q=milk").send(app).await;
    assert_eq!(response.status(), 200);
    let items: Vec<serde_json::Value> = response.json();
    let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Milk", "milk powder", "Whole Milk"]);
}

// ============================================================================
// Recipes over HTTP
// ============================================================================

#[tokio::test]
async fn test_recipe_lifecycle() {
    let app = create_test_app().await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&serde_json::json!({
            "name": "Omelette",
            "servings": 2,
            "ingredients": [
                {"name": "eggs", "amount": "3"},
                {"name": "butter"}
            ],
            "steps": [
                {"step_number": 1, "instruction": "Beat the eggs."},
                {"step_number": 2, "instruction": "Cook in butter."}
            ]
        }))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 201);
    let recipe: serde_json::Value = response.json();
    let recipe_id = recipe["id"].as_i64().unwrap();
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 2);

    let response = AxumTestRequest::post(&format!("/api/recipes/{recipe_id}/favorite"))
        .send(app.clone())
        .await;
    let recipe: serde_json::Value = response.json();
    assert_eq!(recipe["is_favorite"], true);

    let response = AxumTestRequest::get("/api/recipes?favorites_only=true")
        .send(app.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);

    let response = AxumTestRequest::delete(&format!("/api/recipes/{recipe_id}"))
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);

    let response = AxumTestRequest::get(&format!("/api/recipes/{recipe_id}"))
        .send(app)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_can_make_over_http() {
    let app = create_test_app().await;

    for (name, location) in [("Eggs", "inventory"), ("Butter", "inventory")] {
        AxumTestRequest::post("/api/items")
            .json(&serde_json::json!({"name": name, "location": location}))
            .send(app.clone())
            .await;
    }

    let response = AxumTestRequest::post("/api/recipes")
        .json(&serde_json::json!({
            "name": "Cake",
            "ingredients": [{"name": "eggs"}, {"name": "milk"}, {"name": "flour"}]
        }))
        .send(app.clone())
        .await;
    let recipe: serde_json::Value = response.json();
    let recipe_id = recipe["id"].as_i64().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{recipe_id}/can-make"))
        .send(app)
        .await;
    assert_eq!(response.status(), 200);
    let report: serde_json::Value = response.json();
    assert_eq!(report["total_ingredients"], 3);
    assert_eq!(report["available"], serde_json::json!(["eggs"]));
    assert_eq!(report["missing"], serde_json::json!(["milk", "flour"]));
}

// ============================================================================
// Unconfigured AI Features
// ============================================================================

#[tokio::test]
async fn test_recipe_suggestions_unconfigured_is_503() {
    let app = create_test_app().await;
    let response = AxumTestRequest::post("/api/ai/recipe-suggestions")
        .json(&serde_json::json!({"query": "soup"}))
        .send(app)
        .await;

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "FEATURE_NOT_CONFIGURED");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_grocery_suggestions_unconfigured_is_503() {
    let app = create_test_app().await;
    let response = AxumTestRequest::post("/api/ai/grocery-suggestions")
        .send(app)
        .await;

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_discovery_endpoints_unconfigured_are_503() {
    let app = create_test_app().await;

    let response = AxumTestRequest::get("/api/discovery/recipe/42")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 503);

    let response = AxumTestRequest::post("/api/discovery/search")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 503);

    let response = AxumTestRequest::post("/api/discovery/import/42")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 503);

    let response = AxumTestRequest::post("/api/discovery/import-url")
        .json(&serde_json::json!({"url": "https://example.com/recipe"}))
        .send(app)
        .await;
    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "FEATURE_NOT_CONFIGURED");
}
