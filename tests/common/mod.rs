// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use backlog_favorites::config::Config;
use backlog_favorites::db::{FavoriteStore, FirestoreDb, MemoryFavoriteStore, MemoryTokenStore, TokenStore};
use backlog_favorites::models::AuthToken;
use backlog_favorites::routes::create_router;
use backlog_favorites::services::{
    upstream_http_client, ActivityClient, BacklogOAuthClient, FavoritesService, TokenManager,
};
use backlog_favorites::AppState;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// A running app wired to a mock Backlog space and in-memory stores.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub upstream: MockServer,
    pub tokens: Arc<dyn TokenStore>,
    pub favorites: Arc<dyn FavoriteStore>,
}

/// Create a test app whose upstream is a fresh wiremock server.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    let upstream = MockServer::start().await;
    let config = Config::for_space(&upstream.uri());
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let favorites: Arc<dyn FavoriteStore> = Arc::new(MemoryFavoriteStore::new());

    let state = build_state(config, tokens.clone(), favorites.clone());
    TestApp {
        router: create_router(state.clone()),
        state,
        upstream,
        tokens,
        favorites,
    }
}

/// Wire the services the same way `main` does.
#[allow(dead_code)]
pub fn build_state(
    config: Config,
    tokens: Arc<dyn TokenStore>,
    favorites: Arc<dyn FavoriteStore>,
) -> Arc<AppState> {
    let http = upstream_http_client(config.upstream_timeout).expect("HTTP client");
    let oauth = BacklogOAuthClient::new(http.clone(), config.oauth.clone(), &config.space_url);
    let token_manager = Arc::new(TokenManager::new(oauth, tokens));
    let activity = ActivityClient::new(http, &config.space_url);
    let favorites = FavoritesService::new(
        token_manager.clone(),
        activity,
        favorites,
        config.activity_fetch_limit,
    );

    Arc::new(AppState {
        config,
        token_manager,
        favorites,
    })
}

/// Create a test session JWT.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    backlog_favorites::middleware::auth::create_jwt(user_id, signing_key).expect("JWT")
}

/// A token for `user_id` with the given access token and expiry.
#[allow(dead_code)]
pub fn stored_token(user_id: &str, access_token: &str, expires_at: DateTime<Utc>) -> AuthToken {
    AuthToken {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: format!("refresh-{}", user_id),
        expires_at,
        user_id: user_id.to_string(),
    }
}

/// Token valid for the next hour.
#[allow(dead_code)]
pub fn fresh_token(user_id: &str) -> AuthToken {
    stored_token(user_id, "access-live", Utc::now() + chrono::Duration::hours(1))
}

/// Three-entry activity feed, newest first.
#[allow(dead_code)]
pub fn feed_json() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 9,
            "project": { "id": 1, "name": "Website" },
            "type": 3,
            "content": { "summary": "Review layout" },
            "createdUser": { "id": 100, "name": "Hanako" },
            "created": "2025-03-03T09:00:00Z"
        },
        {
            "id": 8,
            "project": { "id": 2, "name": "Mobile" },
            "type": 12,
            "content": { "summary": "Release build" },
            "createdUser": { "id": 101, "name": "Taro" },
            "created": "2025-03-02T09:00:00Z"
        },
        {
            "id": 7,
            "project": { "id": 1, "name": "Website" },
            "type": 1,
            "content": { "summary": "Fix login redirect" },
            "createdUser": { "id": 100, "name": "Hanako" },
            "created": "2025-03-01T09:00:00Z"
        }
    ])
}

/// Serve [`feed_json`] on the activities endpoint.
#[allow(dead_code)]
pub async fn mount_feed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/space/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_json()))
        .mount(server)
        .await;
}

/// Answer the authorization-code grant with a one-hour token.
#[allow(dead_code)]
pub async fn mount_code_exchange(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-from-code"
        })))
        .mount(server)
        .await;
}

/// Serve a profile with numeric id `id`.
#[allow(dead_code)]
pub async fn mount_profile(server: &MockServer, id: u64, name: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v2/users/myself"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id,
            "userId": name.to_lowercase(),
            "name": name,
            "roleType": 1,
            "lang": "en",
            "mailAddress": format!("{}@example.com", name.to_lowercase())
        })))
        .mount(server)
        .await;
}
