// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token lifecycle: authorization, refresh-before-use, and logout.

use crate::db::TokenStore;
use crate::error::AppError;
use crate::models::{AuthToken, User};
use crate::services::{BacklogOAuthClient, OAuthStateStore};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared refresh locks type, keyed by user ID.
pub type RefreshLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Owns the rules for obtaining, refreshing and discarding user tokens.
///
/// This service encapsulates:
/// - The authorization-code callback (exchange, profile, bind, persist)
/// - Refresh of expired tokens before they are handed out
/// - Per-user locking so concurrent requests trigger one refresh
/// - OAuth `state` issuance and verification
pub struct TokenManager {
    oauth: BacklogOAuthClient,
    store: Arc<dyn TokenStore>,
    states: OAuthStateStore,
    refresh_locks: RefreshLocks,
}

impl TokenManager {
    pub fn new(oauth: BacklogOAuthClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            oauth,
            store,
            states: OAuthStateStore::default(),
            refresh_locks: Arc::new(DashMap::new()),
        }
    }

    // ─── Authorization ───────────────────────────────────────────────────────

    /// Start an authorization: issue a state and return the consent URL.
    pub fn authorization_url(&self) -> Result<String, AppError> {
        let state = self.states.issue()?;
        Ok(self.oauth.authorization_url(&state))
    }

    /// Verify the callback's state, then [`authorize`](Self::authorize).
    pub async fn complete_authorization(
        &self,
        state: &str,
        code: &str,
    ) -> Result<(AuthToken, User), AppError> {
        self.states.consume(state)?;
        self.authorize(code).await
    }

    /// Consume the state of a callback the user declined at the consent page.
    pub fn cancel_authorization(&self, state: &str) -> Result<(), AppError> {
        self.states.consume(state)
    }

    /// Exchange a code, bind the token to the profile's user ID and persist it.
    ///
    /// Nothing is stored if either the exchange or the profile fetch fails.
    pub async fn authorize(&self, code: &str) -> Result<(AuthToken, User), AppError> {
        let mut token = self.oauth.exchange(code).await?;
        let user = self.oauth.fetch_profile(&token.access_token).await?;

        token.user_id = user.id.clone();
        self.store.save(&token).await?;

        tracing::info!(user_id = %user.id, name = %user.name, "User authorized, token stored");
        Ok((token, user))
    }

    // ─── Token Use ───────────────────────────────────────────────────────────

    /// Get a usable token for `user_id`, refreshing it first if it has expired.
    ///
    /// On refresh failure the stored token is left as it was.
    pub async fn valid_token(&self, user_id: &str) -> Result<AuthToken, AppError> {
        let token = self.load(user_id).await?;
        if !token.is_expired_at(Utc::now()) {
            return Ok(token);
        }

        // Only one task per user performs the refresh; others wait here.
        let lock = self
            .refresh_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another task may have refreshed while we were waiting.
        let token = self.load(user_id).await?;
        if !token.is_expired_at(Utc::now()) {
            return Ok(token);
        }

        tracing::info!(user_id, "Access token expired, refreshing");

        let mut refreshed = self.oauth.refresh(&token.refresh_token).await.map_err(|e| {
            tracing::warn!(user_id, error = %e, "Token refresh rejected");
            e
        })?;
        refreshed.user_id = user_id.to_string();
        self.store.save(&refreshed).await?;

        tracing::info!(user_id, "Token refreshed and stored");
        Ok(refreshed)
    }

    /// Confirm that `user_id` has a token on file, without refreshing it.
    pub async fn ensure_known(&self, user_id: &str) -> Result<(), AppError> {
        self.load(user_id).await.map(|_| ())
    }

    /// Discard the user's token. Succeeds whether or not one existed.
    pub async fn logout(&self, user_id: &str) -> Result<(), AppError> {
        self.store.delete(user_id).await?;
        self.refresh_locks.remove(user_id);
        tracing::info!(user_id, "User logged out, token deleted");
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<AuthToken, AppError> {
        self.store
            .find(user_id)
            .await?
            .ok_or(AppError::UnknownUser)
    }
}
