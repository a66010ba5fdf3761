//! # Temporal Parsing — UTC-Only Timestamps
//!
//! All dates in the system are `DateTime<Utc>`. Clients send dates in a
//! handful of forms — `JSON.stringify(new Date(...))` produces RFC 3339
//! with a `Z` suffix, the report range pickers append bare
//! `T00:00:00`/`T23:59:59` times, and manual tooling sends plain
//! `YYYY-MM-DD` — so the boundary parser accepts all three and converts
//! to UTC exactly once.
//!
//! Naive inputs (no offset) are interpreted as UTC, matching how the
//! records were historically stored. A bare date means midnight UTC; range
//! callers are expected to supply start-of-day and end-of-day bounds
//! themselves.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ValidationError;

/// Parse an event date from any accepted wire form.
///
/// Accepted forms, tried in order:
/// 1. RFC 3339 with offset (`2024-01-15T00:00:00.000Z`,
///    `2024-01-15T05:30:00+05:30`) — converted to UTC.
/// 2. Naive datetime (`2024-01-15T23:59:59`, optional fractional
///    seconds) — interpreted as UTC.
/// 3. Bare date (`2024-01-15`) — midnight UTC.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] when none of the forms match.
pub fn parse_event_date(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        // Midnight UTC. NaiveDate::and_hms_opt(0,0,0) is always valid.
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(ValidationError::InvalidDate {
        input: s.to_string(),
    })
}
