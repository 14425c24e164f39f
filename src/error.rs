// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    /// No token on file; the user must sign in again.
    #[error("No token stored for user")]
    UnknownUser,

    #[error("OAuth state is unknown or expired")]
    InvalidState,

    #[error("Authorization code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    #[error("Item is already a favorite")]
    AlreadyFavorite,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Backlog API error: {0}")]
    BacklogApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::UnknownUser => (StatusCode::UNAUTHORIZED, "unknown_user", None),
            AppError::InvalidState => (StatusCode::BAD_REQUEST, "invalid_state", None),
            AppError::ExchangeFailed(msg) => {
                tracing::warn!(error = %msg, "Authorization code exchange failed");
                (StatusCode::BAD_GATEWAY, "exchange_failed", None)
            }
            AppError::RefreshFailed(msg) => {
                tracing::warn!(error = %msg, "Token refresh failed");
                (StatusCode::UNAUTHORIZED, "refresh_failed", None)
            }
            AppError::ProfileFetchFailed(msg) => {
                tracing::warn!(error = %msg, "Profile fetch failed");
                (StatusCode::BAD_GATEWAY, "profile_fetch_failed", None)
            }
            AppError::AlreadyFavorite => (StatusCode::CONFLICT, "already_favorite", None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::BacklogApi(msg) => {
                (StatusCode::BAD_GATEWAY, "backlog_error", Some(msg.clone()))
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
