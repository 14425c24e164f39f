// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod favorites;
pub mod oauth;
pub mod oauth_state;
pub mod token;

pub use activity::ActivityClient;
pub use favorites::FavoritesService;
pub use oauth::BacklogOAuthClient;
pub use oauth_state::OAuthStateStore;
pub use token::TokenManager;

use crate::error::AppError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the HTTP client used for every upstream call.
pub fn upstream_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}

/// Check response status and parse the JSON body, mapping every failure
/// through `to_error`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    to_error: fn(String) -> AppError,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            tracing::warn!("Backlog rate limit hit (429)");
        }
        return Err(to_error(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| to_error(format!("JSON parse error: {}", e)))
}
