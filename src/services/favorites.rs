// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites overlay: merges the activity feed with the caller's favorites.
//!
//! Reads never hard-fail because of the upstream: any fetch error, or a
//! token with no usable access token, is answered with the mock feed.
//! Favorite writes propagate every store error.

use crate::db::FavoriteStore;
use crate::error::AppError;
use crate::models::{ActivityItem, AnnotatedItem, AuthToken, Favorite};
use crate::services::activity::mock_activity_items;
use crate::services::{ActivityClient, TokenManager};
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Overlay engine for item search and favorite management.
pub struct FavoritesService {
    tokens: Arc<TokenManager>,
    activity: ActivityClient,
    favorites: Arc<dyn FavoriteStore>,
    /// Per-user mutex serializing the add-favorite check-then-insert.
    favorite_locks: DashMap<String, Arc<Mutex<()>>>,
    fetch_limit: u32,
}

impl FavoritesService {
    pub fn new(
        tokens: Arc<TokenManager>,
        activity: ActivityClient,
        favorites: Arc<dyn FavoriteStore>,
        fetch_limit: u32,
    ) -> Self {
        Self {
            tokens,
            activity,
            favorites,
            favorite_locks: DashMap::new(),
            fetch_limit,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Search the feed and flag the caller's favorites, in upstream order.
    pub async fn search_items(
        &self,
        user_id: &str,
        keyword: &str,
    ) -> Result<Vec<AnnotatedItem>, AppError> {
        let token = self.tokens.valid_token(user_id).await?;
        let items = self.fetch_or_mock(&token, keyword).await;
        let favorite_ids = self.favorite_item_ids(user_id).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let is_favorite = favorite_ids.contains(&item.id);
                AnnotatedItem::new(item, is_favorite)
            })
            .collect())
    }

    /// Feed items the caller has marked as favorites.
    ///
    /// Favorites whose item is no longer in the fetched feed are omitted.
    pub async fn get_favorites(&self, user_id: &str) -> Result<Vec<AnnotatedItem>, AppError> {
        let token = self.tokens.valid_token(user_id).await?;
        let favorite_ids = self.favorite_item_ids(user_id).await?;
        if favorite_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = self.fetch_or_mock(&token, "").await;
        Ok(items
            .into_iter()
            .filter(|item| favorite_ids.contains(&item.id))
            .map(|item| AnnotatedItem::new(item, true))
            .collect())
    }

    // ─── Writes ──────────────────────────────────────────────────────────────

    /// Mark `item_id` as a favorite of `user_id`.
    ///
    /// Fails with `AlreadyFavorite` if it already is. Calls for the same user
    /// are serialized so concurrent duplicates cannot both insert.
    pub async fn add_favorite(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        self.tokens.ensure_known(user_id).await?;

        let lock = self
            .favorite_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = {
            let _guard = lock.lock().await;
            self.insert_if_absent(user_id, item_id).await
        };
        drop(lock);

        // Only the table holds the lock now: no add for this user is running
        // or waiting, so the entry can go.
        self.favorite_locks
            .remove_if(user_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    /// Remove `item_id` from the user's favorites. Absent favorites are ignored.
    pub async fn remove_favorite(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        self.tokens.ensure_known(user_id).await?;
        self.favorites.delete(user_id, item_id).await?;
        tracing::info!(user_id, item_id, "Favorite removed");
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    /// Must run under the user's favorite lock.
    async fn insert_if_absent(&self, user_id: &str, item_id: &str) -> Result<(), AppError> {
        if self.favorites.exists(user_id, item_id).await? {
            return Err(AppError::AlreadyFavorite);
        }

        let favorite = Favorite::new(user_id, item_id, Utc::now());
        self.favorites.save(&favorite).await?;

        tracing::info!(user_id, item_id, favorite_id = %favorite.id, "Favorite added");
        Ok(())
    }

    async fn favorite_item_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        Ok(self
            .favorites
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|f| f.item_id)
            .collect())
    }

    /// Search upstream, substituting the mock feed on any failure.
    async fn fetch_or_mock(&self, token: &AuthToken, keyword: &str) -> Vec<ActivityItem> {
        if !token.is_usable() {
            tracing::warn!(user_id = %token.user_id, "No usable access token, serving mock feed");
            return mock_activity_items();
        }

        match self
            .activity
            .search_activities(&token.access_token, keyword, self.fetch_limit)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    user_id = %token.user_id,
                    error = %e,
                    "Activity fetch failed, serving mock feed"
                );
                mock_activity_items()
            }
        }
    }
}
