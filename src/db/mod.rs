// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer: token and favorite stores with swappable backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::{MemoryFavoriteStore, MemoryTokenStore};

use crate::error::AppError;
use crate::models::{AuthToken, Favorite};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    /// Latest token per user (keyed by user_id)
    pub const TOKENS: &str = "tokens";
    /// Favorites (keyed by generated favorite id)
    pub const FAVORITES: &str = "favorites";
}

/// Durable mapping from user ID to that user's current token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Save a token under `token.user_id`, replacing any previous one.
    async fn save(&self, token: &AuthToken) -> Result<(), AppError>;

    async fn find(&self, user_id: &str) -> Result<Option<AuthToken>, AppError>;

    /// Delete the user's token. Deleting an absent token is not an error.
    async fn delete(&self, user_id: &str) -> Result<(), AppError>;
}

/// Durable set of (user, item) favorite records.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Favorite>, AppError>;

    async fn save(&self, favorite: &Favorite) -> Result<(), AppError>;

    /// Delete every record for (user_id, item_id). No-op when none exist.
    async fn delete(&self, user_id: &str, item_id: &str) -> Result<(), AppError>;

    async fn exists(&self, user_id: &str, item_id: &str) -> Result<bool, AppError>;
}
