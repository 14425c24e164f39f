// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backlog user profile (transient, never persisted).

use serde::{Deserialize, Serialize};

/// Profile of the authenticated Backlog user.
///
/// Fetched during the OAuth callback to bind a token to a user ID and
/// forwarded to the frontend. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backlog numeric user id, rendered as a string
    pub id: String,
    pub name: String,
    pub role_type: i32,
    pub lang: String,
    pub mail_address: String,
}
