// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backlog-Favorites: bookmark items from a Backlog space's activity feed
//!
//! This crate provides the backend-for-frontend that signs users in with
//! Backlog OAuth2, keeps their tokens fresh, and overlays per-user favorites
//! on the space's activity feed.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{FavoritesService, TokenManager};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub token_manager: Arc<TokenManager>,
    pub favorites: FavoritesService,
}
