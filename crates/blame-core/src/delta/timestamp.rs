//! Instant parsing shared by delta ingestion and filter bounds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// An instant string that matched none of the accepted layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp '{raw}': expected RFC 3339, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD")]
pub struct TimestampError {
    pub raw: String,
}

/// Parse an instant.
///
/// Accepted layouts, tried in order:
/// 1. RFC 3339 with offset (`2016-03-01T08:00:00Z`, `...+02:00`)
/// 2. Naive date-time, read as UTC (`2016-03-01T08:00:00.125`, `2016-03-01 08:00:00`)
/// 3. Bare date, midnight UTC (`2016-03-01`)
///
/// # Errors
///
/// Returns [`TimestampError`] if no layout matches.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(TimestampError {
        raw: raw.to_string(),
    })
}

/// Serde adapter for `#[serde(deserialize_with = ...)]`.
pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

/// Serde adapter for optional instants. `null` and `""` both mean unset.
pub(crate) fn deserialize_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_instant(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
