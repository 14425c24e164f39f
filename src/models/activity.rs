// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity feed items and their annotated API view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Creator of an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct CreatedUser {
    pub id: String,
    pub name: String,
}

/// One entry of the Backlog activity feed.
///
/// Fetched fresh on every request and never stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    /// Upstream activity id
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    /// Human-readable category label
    #[serde(rename = "type")]
    pub kind: String,
    pub content_summary: String,
    pub created_user: CreatedUser,
    pub created: DateTime<Utc>,
}

impl ActivityItem {
    /// Case-sensitive substring match over the searchable fields.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.id.contains(keyword)
            || self.project_name.contains(keyword)
            || self.kind.contains(keyword)
            || self.content_summary.contains(keyword)
            || self.created_user.name.contains(keyword)
    }
}

/// Activity item as returned to the frontend, with its favorite flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedItem {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content_summary: String,
    pub created_user: CreatedUser,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created: DateTime<Utc>,
    pub is_favorite: bool,
}

impl AnnotatedItem {
    pub fn new(item: ActivityItem, is_favorite: bool) -> Self {
        Self {
            id: item.id,
            project_id: item.project_id,
            project_name: item.project_name,
            kind: item.kind,
            content_summary: item.content_summary,
            created_user: item.created_user,
            created: item.created,
            is_favorite,
        }
    }
}
