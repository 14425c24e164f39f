// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::AnnotatedItem;
use crate::routes::auth::SuccessResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/items", get(search_items))
        .route("/api/favorites", get(get_favorites))
        .route(
            "/api/favorites/{item_id}",
            post(add_favorite).delete(remove_favorite),
        )
}

/// List response wrapping annotated feed items.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct ItemsResponse {
    pub items: Vec<AnnotatedItem>,
}

fn validated<T: Validate>(input: T) -> Result<T> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(input)
}

// ─── Items ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct ItemsQuery {
    /// Case-sensitive substring filter; empty or absent returns the whole feed
    #[serde(default)]
    #[validate(length(max = 200))]
    keyword: String,
}

/// Search the activity feed, flagging the caller's favorites.
async fn search_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsResponse>> {
    let query = validated(query)?;
    let items = state
        .favorites
        .search_items(&user.user_id, &query.keyword)
        .await?;

    tracing::debug!(user_id = %user.user_id, count = items.len(), "Items searched");
    Ok(Json(ItemsResponse { items }))
}

// ─── Favorites ───────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct ItemPath {
    #[validate(length(min = 1, max = 64))]
    item_id: String,
}

async fn get_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ItemsResponse>> {
    let items = state.favorites.get_favorites(&user.user_id).await?;
    Ok(Json(ItemsResponse { items }))
}

async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(path): Path<ItemPath>,
) -> Result<Json<SuccessResponse>> {
    let path = validated(path)?;
    state
        .favorites
        .add_favorite(&user.user_id, &path.item_id)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(path): Path<ItemPath>,
) -> Result<Json<SuccessResponse>> {
    let path = validated(path)?;
    state
        .favorites
        .remove_favorite(&user.user_id, &path.item_id)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}
