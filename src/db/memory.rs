// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store backends.
//!
//! Each map sits behind a `std::sync::RwLock`. Guards are held only for the
//! map operation itself and never across an `.await`.

use super::{FavoriteStore, TokenStore};
use crate::error::AppError;
use crate::models::{AuthToken, Favorite};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::Database("in-memory store lock poisoned".to_string())
}

/// Volatile token store keyed by user ID.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, token: &AuthToken) -> Result<(), AppError> {
        self.tokens
            .write()
            .map_err(poisoned)?
            .insert(token.user_id.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, user_id: &str) -> Result<Option<AuthToken>, AppError> {
        Ok(self.tokens.read().map_err(poisoned)?.get(user_id).cloned())
    }

    async fn delete(&self, user_id: &str) -> Result<(), AppError> {
        self.tokens.write().map_err(poisoned)?.remove(user_id);
        Ok(())
    }
}

/// Volatile favorite store keyed by favorite id.
#[derive(Default)]
pub struct MemoryFavoriteStore {
    favorites: RwLock<HashMap<String, Favorite>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Favorite>, AppError> {
        let mut found: Vec<Favorite> = self
            .favorites
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|f| f.created_at);
        Ok(found)
    }

    async fn save(&self, favorite: &Favorite) -> Result<(), AppError> {
        self.favorites
            .write()
            .map_err(poisoned)?
            .insert(favorite.id.clone(), favorite.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        self.favorites
            .write()
            .map_err(poisoned)?
            .retain(|_, f| !(f.user_id == user_id && f.item_id == item_id));
        Ok(())
    }

    async fn exists(&self, user_id: &str, item_id: &str) -> Result<bool, AppError> {
        Ok(self
            .favorites
            .read()
            .map_err(poisoned)?
            .values()
            .any(|f| f.user_id == user_id && f.item_id == item_id))
    }
}
