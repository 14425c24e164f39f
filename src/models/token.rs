// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token model for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's current Backlog OAuth token.
///
/// One per user ID; saving replaces any previous token for the same user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
    /// Absolute expiry of the access token
    pub expires_at: DateTime<Utc>,
    /// Backlog user id this token belongs to (empty until bound)
    pub user_id: String,
}

impl AuthToken {
    /// Whether the access token must be refreshed before use at `now`.
    ///
    /// Strict comparison with no grace period: a token expiring exactly at
    /// `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token carries an access token that can be sent upstream.
    pub fn is_usable(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}
