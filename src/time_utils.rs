// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Utc};

/// Parse an upstream RFC3339 timestamp, yielding the zero time (Unix epoch)
/// when the value is missing or malformed.
pub fn parse_rfc3339_or_zero(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Absolute expiry for a token that is valid for `expires_in` seconds from `now`.
pub fn expiry_from_now(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    now + chrono::Duration::seconds(expires_in.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_valid_timestamp() {
        let parsed = parse_rfc3339_or_zero(Some("2024-03-01T09:30:00Z"));
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_timestamp_normalizes_to_utc() {
        let parsed = parse_rfc3339_or_zero(Some("2024-03-01T18:30:00+09:00"));
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_is_zero_time() {
        assert_eq!(parse_rfc3339_or_zero(Some("yesterday")), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_rfc3339_or_zero(None), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_negative_expires_in_clamps_to_now() {
        let now = Utc::now();
        assert_eq!(expiry_from_now(now, -30), now);
    }
}
