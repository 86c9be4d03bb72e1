// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Environment-based configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default SQLite database file, relative to the working directory
const DEFAULT_DATABASE_PATH: &str = "./data/pantry.db";

/// Default Gemini model used for suggestions
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Default Spoonacular API base URL
const DEFAULT_SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL or bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            DatabaseUrl::Memory
        } else {
            DatabaseUrl::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            DatabaseUrl::SQLite { path } => format!("sqlite:{}?mode=rwc", path.display()),
            DatabaseUrl::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub fn is_memory(&self) -> bool {
        matches!(self, DatabaseUrl::Memory)
    }

    /// The directory the database file lives in, if any
    #[must_use]
    pub fn parent_dir(&self) -> Option<&std::path::Path> {
        match self {
            DatabaseUrl::SQLite { path } => path.parent().filter(|p| !p.as_os_str().is_empty()),
            DatabaseUrl::Memory => None,
        }
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        DatabaseUrl::SQLite {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Server configuration, read from the environment once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Gemini AI configuration
    pub gemini: GeminiConfig,
    /// Spoonacular recipe discovery configuration
    pub spoonacular: SpoonacularConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location (SQLite file path or in-memory)
    pub url: DatabaseUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; absence disables the AI suggestion endpoints
    pub api_key: Option<String>,
    /// Model name used for all generation calls
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoonacularConfig {
    /// API key; absence disables the discovery endpoints
    pub api_key: Option<String>,
    /// API base URL, overridable for testing
    pub base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse (e.g. a
    /// non-numeric `HTTP_PORT`)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port.parse().context("Invalid HTTP_PORT value")?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        // DATABASE_URL wins; DATABASE_PATH is the documented single-file knob
        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DATABASE_PATH"))
            .map_or_else(|_| DatabaseUrl::default(), |s| DatabaseUrl::parse_url(&s));

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let spoonacular_api_key = env::var("SPOONACULAR_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Ok(Self {
            http_port,
            database: DatabaseConfig { url: database_url },
            gemini: GeminiConfig {
                api_key: gemini_api_key,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_owned()),
            },
            spoonacular: SpoonacularConfig {
                api_key: spoonacular_api_key,
                base_url: env::var("SPOONACULAR_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_SPOONACULAR_BASE_URL.to_owned()),
            },
        })
    }

    /// Whether the Gemini AI endpoints are enabled
    #[must_use]
    pub fn gemini_enabled(&self) -> bool {
        self.gemini.api_key.is_some()
    }

    /// Whether the Spoonacular discovery endpoints are enabled
    #[must_use]
    pub fn spoonacular_enabled(&self) -> bool {
        self.spoonacular.api_key.is_some()
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pantry Server Configuration:\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Gemini AI: {}\n\
             - Spoonacular: {}",
            self.http_port,
            self.database.url,
            if self.gemini_enabled() {
                "Enabled"
            } else {
                "Disabled"
            },
            if self.spoonacular_enabled() {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database: DatabaseConfig {
                url: DatabaseUrl::default(),
            },
            gemini: GeminiConfig {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_owned(),
            },
            spoonacular: SpoonacularConfig {
                api_key: None,
                base_url: DEFAULT_SPOONACULAR_BASE_URL.to_owned(),
            },
        }
    }
}
