// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pending OAuth `state` values.
//!
//! Each authorization attempt gets an unpredictable state that must come back
//! on the callback exactly once and within the TTL.

use crate::error::AppError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};

const STATE_BYTES: usize = 32;
const DEFAULT_STATE_TTL_SECS: i64 = 10 * 60;

/// Table of issued, not yet consumed OAuth states.
pub struct OAuthStateStore {
    pending: DashMap<String, DateTime<Utc>>,
    ttl: Duration,
    rng: SystemRandom,
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_STATE_TTL_SECS))
    }
}

impl OAuthStateStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            ttl,
            rng: SystemRandom::new(),
        }
    }

    /// Generate and remember a fresh state value.
    pub fn issue(&self) -> Result<String, AppError> {
        let mut bytes = [0u8; STATE_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate OAuth state")))?;
        let state = URL_SAFE_NO_PAD.encode(bytes);

        let now = Utc::now();
        self.prune(now);
        self.pending.insert(state.clone(), now);
        Ok(state)
    }

    /// Consume a state returned by the callback.
    ///
    /// Fails with `InvalidState` if it was never issued, was already used, or
    /// has expired.
    pub fn consume(&self, state: &str) -> Result<(), AppError> {
        let now = Utc::now();
        match self.pending.remove(state) {
            Some((_, issued_at)) if now - issued_at < self.ttl => Ok(()),
            Some(_) => {
                tracing::warn!("Expired OAuth state presented");
                Err(AppError::InvalidState)
            }
            None => {
                tracing::warn!("Unknown OAuth state presented");
                Err(AppError::InvalidState)
            }
        }
    }

    /// Number of outstanding states.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn prune(&self, now: DateTime<Utc>) {
        self.pending.retain(|_, issued_at| now - *issued_at < self.ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_single_use() {
        let store = OAuthStateStore::default();
        let state = store.issue().unwrap();

        assert!(store.consume(&state).is_ok());
        assert!(matches!(store.consume(&state), Err(AppError::InvalidState)));
    }

    #[test]
    fn test_unknown_state_rejected() {
        let store = OAuthStateStore::default();
        assert!(matches!(store.consume("state"), Err(AppError::InvalidState)));
    }

    #[test]
    fn test_expired_state_rejected() {
        let store = OAuthStateStore::with_ttl(Duration::zero());
        let state = store.issue().unwrap();
        assert!(matches!(store.consume(&state), Err(AppError::InvalidState)));
    }

    #[test]
    fn test_states_are_unpredictable_and_url_safe() {
        let store = OAuthStateStore::default();
        let a = store.issue().unwrap();
        let b = store.issue().unwrap();

        assert_ne!(a, b);
        assert_eq!(store.pending_count(), 2);
        assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
    }
}
