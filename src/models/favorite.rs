// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite model for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's bookmark of one activity-feed item.
///
/// At most one record exists per (user_id, item_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Locally generated UUID (also used as document ID)
    pub id: String,
    pub user_id: String,
    /// Upstream activity id
    pub item_id: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Create a new favorite with a fresh id.
    pub fn new(user_id: &str, item_id: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            created_at,
        }
    }
}
