// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backlog OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::AppState;

/// Public OAuth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/url", get(auth_url))
        .route("/api/auth/callback", get(auth_callback))
}

/// Routes needing a session; the auth layer is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/logout", post(logout))
}

#[derive(Serialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Issue a pending state and return the Backlog consent URL.
async fn auth_url(State(state): State<Arc<AppState>>) -> Result<Json<AuthUrlResponse>> {
    let url = state.token_manager.authorization_url()?;
    tracing::info!("Issued OAuth authorization URL");
    Ok(Json(AuthUrlResponse { url }))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - verify state, exchange code, create session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let frontend_url = state.config.frontend_url.trim_end_matches('/');
    let oauth_state = params.state.as_deref().ok_or(AppError::InvalidState)?;

    // Denied consent: burn the state and hand the error to the frontend
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Backlog");
        if state.token_manager.cancel_authorization(oauth_state).is_err() {
            tracing::debug!("Denied callback carried an unknown state");
        }
        let redirect = format!(
            "{}/auth/callback?error={}",
            frontend_url,
            urlencoding::encode(&error)
        );
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("authorization code is required".to_string()))?;

    let (_token, user) = state
        .token_manager
        .complete_authorization(oauth_state, &code)
        .await?;

    let jwt = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let user_json = serde_json::to_vec(&user)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("User encoding failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, jwt.clone()))
        .path("/")
        .http_only(true)
        .secure(frontend_url.starts_with("https://"))
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build();

    let redirect_url = format!(
        "{}/auth/callback?token={}&user={}",
        frontend_url,
        jwt,
        URL_SAFE.encode(user_json)
    );

    Ok((jar.add(cookie), Redirect::temporary(&redirect_url)))
}

/// Logout - discard the stored token and clear the session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    state.token_manager.logout(&user.user_id).await?;
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json(SuccessResponse { success: true })))
}
