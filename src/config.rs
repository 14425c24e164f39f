// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. A `.env` file is honored for local
//! development.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which backend holds tokens and favorites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local maps, lost on restart.
    Memory,
    /// Firestore collections (`tokens`, `favorites`).
    Firestore,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            other => Err(ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

/// OAuth client settings for the Backlog space.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Backlog integration ---
    /// Space base URL, e.g. `https://example.backlog.com`
    pub space_url: String,
    pub oauth: OAuthConfig,
    /// Timeout applied to every upstream request
    pub upstream_timeout: Duration,
    /// `count` passed to the activity feed endpoint
    pub activity_fetch_limit: u32,

    // --- Server ---
    /// Frontend URL for OAuth redirects and CORS
    pub frontend_url: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self::for_space("http://127.0.0.1:9")
    }

    /// Test config whose OAuth and API endpoints all live under `space_url`.
    ///
    /// Integration tests point this at a mock server.
    pub fn for_space(space_url: &str) -> Self {
        let space_url = space_url.trim_end_matches('/').to_string();
        Self {
            oauth: OAuthConfig {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                redirect_uri: "http://localhost:8081/api/auth/callback".to_string(),
                auth_url: format!("{}/OAuth2AccessRequest.action", space_url),
                token_url: format!("{}/api/v2/oauth2/token", space_url),
                scopes: vec!["read".to_string()],
            },
            space_url,
            upstream_timeout: Duration::from_secs(2),
            activity_fetch_limit: 100,
            frontend_url: "http://localhost:3000".to_string(),
            port: 8081,
            storage_backend: StorageBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let space_url = required("BACKLOG_SPACE_URL")?
            .trim_end_matches('/')
            .to_string();

        let oauth = OAuthConfig {
            client_id: required("BACKLOG_CLIENT_ID")?,
            client_secret: required("BACKLOG_CLIENT_SECRET")?,
            redirect_uri: required("OAUTH_REDIRECT_URI")?,
            auth_url: env::var("BACKLOG_AUTH_URL")
                .unwrap_or_else(|_| format!("{}/OAuth2AccessRequest.action", space_url)),
            token_url: env::var("BACKLOG_TOKEN_URL")
                .unwrap_or_else(|_| format!("{}/api/v2/oauth2/token", space_url)),
            scopes: vec!["read".to_string()],
        };

        Ok(Self {
            space_url,
            oauth,
            upstream_timeout: Duration::from_secs(parsed("UPSTREAM_TIMEOUT_SECS", 10)?),
            activity_fetch_limit: parsed("ACTIVITY_FETCH_LIMIT", 100)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: parsed("PORT", 8081)?,
            storage_backend: env::var("STORAGE_BACKEND")
                .unwrap_or_default()
                .parse()?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            jwt_signing_key: required("JWT_SIGNING_KEY")?.into_bytes(),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
