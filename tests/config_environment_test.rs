// ABOUTME: Unit tests for config environment functionality
// ABOUTME: Validates database URL parsing, env loading, and feature flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pantry_server::config::{DatabaseUrl, ServerConfig};
use pantry_server::database::Database;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

// ============================================================================
// DatabaseUrl
// ============================================================================

#[test]
fn test_database_url_parsing() {
    match DatabaseUrl::parse_url("sqlite:./data/pantry.db") {
        DatabaseUrl::SQLite { path } => assert_eq!(path, PathBuf::from("./data/pantry.db")),
        DatabaseUrl::Memory => panic!("expected file-backed database"),
    }

    assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());

    // A bare path is treated as a SQLite file
    match DatabaseUrl::parse_url("/var/lib/pantry/pantry.db") {
        DatabaseUrl::SQLite { path } => {
            assert_eq!(path, PathBuf::from("/var/lib/pantry/pantry.db"));
        }
        DatabaseUrl::Memory => panic!("expected file-backed database"),
    }
}

#[test]
fn test_database_url_connection_string() {
    let url = DatabaseUrl::parse_url("sqlite:./data/pantry.db");
    assert_eq!(
        url.to_connection_string(),
        "sqlite:./data/pantry.db?mode=rwc"
    );
    assert_eq!(
        DatabaseUrl::Memory.to_connection_string(),
        "sqlite::memory:"
    );
}

#[test]
fn test_database_url_parent_dir() {
    let url = DatabaseUrl::parse_url("./data/pantry.db");
    assert_eq!(url.parent_dir(), Some(std::path::Path::new("./data")));

    let bare = DatabaseUrl::parse_url("pantry.db");
    assert!(bare.parent_dir().is_none());

    assert!(DatabaseUrl::Memory.parent_dir().is_none());
}

// ============================================================================
// ServerConfig::from_env
// ============================================================================

fn clear_config_env() {
    for key in [
        "HTTP_PORT",
        "DATABASE_URL",
        "DATABASE_PATH",
        "GEMINI_API_KEY",
        "GEMINI_MODEL",
        "SPOONACULAR_API_KEY",
        "SPOONACULAR_BASE_URL",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_config_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert!(!config.gemini_enabled());
    assert!(!config.spoonacular_enabled());
    assert_eq!(config.gemini.model, "gemini-2.5-flash-lite");
    assert_eq!(
        config.database.url.to_connection_string(),
        "sqlite:./data/pantry.db?mode=rwc"
    );
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_config_env();
    env::set_var("HTTP_PORT", "9999");
    env::set_var("DATABASE_PATH", "/tmp/test-pantry.db");
    env::set_var("GEMINI_API_KEY", "test-key");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9999);
    assert!(config.gemini_enabled());
    assert!(!config.spoonacular_enabled());
    assert_eq!(
        config.database.url.to_connection_string(),
        "sqlite:/tmp/test-pantry.db?mode=rwc"
    );

    clear_config_env();
}

#[test]
#[serial]
fn test_from_env_database_url_wins_over_path() {
    clear_config_env();
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("DATABASE_PATH", "/tmp/ignored.db");

    let config = ServerConfig::from_env().unwrap();
    assert!(config.database.url.is_memory());

    clear_config_env();
}

#[test]
#[serial]
fn test_from_env_invalid_port_is_error() {
    clear_config_env();
    env::set_var("HTTP_PORT", "not-a-port");

    assert!(ServerConfig::from_env().is_err());

    clear_config_env();
}

#[test]
#[serial]
fn test_from_env_empty_key_disables_feature() {
    clear_config_env();
    env::set_var("GEMINI_API_KEY", "");

    let config = ServerConfig::from_env().unwrap();
    assert!(!config.gemini_enabled());

    clear_config_env();
}

#[test]
fn test_summary_redacts_secrets() {
    let mut config = ServerConfig::default();
    config.gemini.api_key = Some("secret-key".to_owned());

    let summary = config.summary();
    assert!(summary.contains("Gemini AI: Enabled"));
    assert!(!summary.contains("secret-key"));
}

// ============================================================================
// Database bootstrap
// ============================================================================

#[tokio::test]
async fn test_database_created_at_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pantry.db");
    let url = DatabaseUrl::SQLite { path: path.clone() };

    let database = Database::new(&url.to_connection_string()).await.unwrap();
    // Schema is usable immediately after creation
    database.items().list(None).await.unwrap();

    assert!(path.exists());
}
