// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backlog OAuth2 client.
//!
//! Handles:
//! - Authorization URL construction
//! - Authorization-code exchange
//! - Refresh-token exchange
//! - Fetching the authenticated user's profile

use crate::config::OAuthConfig;
use crate::error::AppError;
use crate::models::{AuthToken, User};
use crate::services::read_json;
use crate::time_utils::expiry_from_now;
use chrono::Utc;
use serde::Deserialize;

/// Backlog OAuth client. Every call is a single attempt with the client's timeout.
#[derive(Clone)]
pub struct BacklogOAuthClient {
    http: reqwest::Client,
    config: OAuthConfig,
    space_url: String,
}

impl BacklogOAuthClient {
    pub fn new(http: reqwest::Client, config: OAuthConfig, space_url: &str) -> Self {
        Self {
            http,
            config,
            space_url: space_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL the browser is sent to for user consent.
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scopes.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for a token.
    ///
    /// The returned token has an empty `user_id`; the caller binds it.
    pub async fn exchange(&self, code: &str) -> Result<AuthToken, AppError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExchangeFailed(format!("Token request failed: {}", e)))?;

        let body: TokenResponse = read_json(response, AppError::ExchangeFailed).await?;
        Ok(body.into_token(None))
    }

    /// Exchange a refresh token for a new token.
    ///
    /// If the response omits a refresh token the old one stays in use.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, AppError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::RefreshFailed(format!("Token refresh request failed: {}", e))
            })?;

        let body: TokenResponse = read_json(response, AppError::RefreshFailed).await?;
        Ok(body.into_token(Some(refresh_token)))
    }

    /// Get the profile of the user owning `access_token`.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<User, AppError> {
        let url = format!("{}/api/v2/users/myself", self.space_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ProfileFetchFailed(e.to_string()))?;

        let profile: BacklogUser = read_json(response, AppError::ProfileFetchFailed).await?;
        Ok(profile.into())
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    /// Lifetime in seconds
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<&str>) -> AuthToken {
        let refresh_token = self
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        AuthToken {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token,
            expires_at: expiry_from_now(Utc::now(), self.expires_in),
            user_id: String::new(),
        }
    }
}

/// `GET /api/v2/users/myself` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BacklogUser {
    id: u64,
    name: String,
    #[serde(default)]
    role_type: i32,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    mail_address: Option<String>,
}

impl From<BacklogUser> for User {
    fn from(u: BacklogUser) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name,
            role_type: u.role_type,
            lang: u.lang.unwrap_or_default(),
            mail_address: u.mail_address.unwrap_or_default(),
        }
    }
}
