// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backlog-Favorites API Server
//!
//! Signs users in with Backlog OAuth2 and serves their space's activity
//! feed annotated with per-user favorites.

use backlog_favorites::{
    config::{Config, StorageBackend},
    db::{FavoriteStore, FirestoreDb, MemoryFavoriteStore, MemoryTokenStore, TokenStore},
    services::{
        upstream_http_client, ActivityClient, BacklogOAuthClient, FavoritesService, TokenManager,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        space = %config.space_url,
        "Starting Backlog-Favorites API"
    );

    // Select storage backend
    let (token_store, favorite_store): (Arc<dyn TokenStore>, Arc<dyn FavoriteStore>) =
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
                let favorites: Arc<dyn FavoriteStore> = Arc::new(MemoryFavoriteStore::new());
                (tokens, favorites)
            }
            StorageBackend::Firestore => {
                let db = Arc::new(FirestoreDb::new(&config.gcp_project_id).await?);
                tracing::info!(project = %config.gcp_project_id, "Firestore storage initialized");
                let tokens: Arc<dyn TokenStore> = db.clone();
                let favorites: Arc<dyn FavoriteStore> = db;
                (tokens, favorites)
            }
        };

    // One HTTP client (and connection pool) for every upstream call
    let http = upstream_http_client(config.upstream_timeout)?;

    let oauth = BacklogOAuthClient::new(http.clone(), config.oauth.clone(), &config.space_url);
    let token_manager = Arc::new(TokenManager::new(oauth, token_store));
    let activity = ActivityClient::new(http, &config.space_url);
    let favorites = FavoritesService::new(
        token_manager.clone(),
        activity,
        favorite_store,
        config.activity_fetch_limit,
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        token_manager,
        favorites,
    });

    // Build router
    let app = backlog_favorites::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("backlog_favorites=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
