// ABOUTME: Server binary for the Pantry HTTP API
// ABOUTME: Loads configuration, prepares the database, and serves axum routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Pantry Server Binary
//!
//! Starts the local-first inventory API: configuration from the environment,
//! SQLite schema migration, then the HTTP server until ctrl-c.

use anyhow::{Context, Result};
use clap::Parser;
use pantry_server::{
    config::ServerConfig,
    database::Database,
    logging,
    routes::{self, ServerResources},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "pantry-server")]
#[command(about = "Pantry Server - Local-first household inventory tracking API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database location (SQLite path or sqlite: URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using environment configuration");
            Args {
                http_port: None,
                database_url: None,
            }
        }
    };

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = &args.database_url {
        config.database.url = pantry_server::config::DatabaseUrl::parse_url(database_url);
    }

    logging::init_from_env()?;

    info!("Starting Pantry Server");
    info!("{}", config.summary());

    // The SQLite file's directory must exist before the pool connects
    if let Some(dir) = config.database.url.parent_dir() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    }

    let database = Database::new(&config.database.url.to_connection_string())
        .await
        .context("Failed to initialize database")?;
    info!("Database initialized: {}", config.database.url);

    let resources = Arc::new(
        ServerResources::new(database, config.clone())
            .context("Failed to initialize server resources")?,
    );
    let app = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.http_port))?;
    info!("Listening on http://0.0.0.0:{}", config.http_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Pantry Server stopped");
    Ok(())
}

/// Resolve when ctrl-c is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
