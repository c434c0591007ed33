//! Snapshot timestamp helpers.
//!
//! Snapshot timestamps are UTC instants aligned to the top of an hour and are
//! stored as Unix milliseconds.

use chrono::{DateTime, DurationRound, TimeDelta, TimeZone, Utc};

use crate::errors::{ExError, ExErrorKind, Result};

/// Truncate an instant to its hour boundary (14:37:12.5 → 14:00:00.000).
pub fn align_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    // Hour truncation on UTC cannot overflow for any representable instant.
    at.duration_trunc(TimeDelta::hours(1)).unwrap_or(at)
}

/// Whether an instant has zero minute, second and sub-second components.
pub fn is_hour_aligned(at: DateTime<Utc>) -> bool {
    align_to_hour(at) == at
}

/// Encode for storage
pub fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Decode from storage
pub fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("from_millis")
            .with_message(format!("timestamp out of range: {}", ms))
    })
}
