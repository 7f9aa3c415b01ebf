//! ISO-8601 timestamp codec (§4.1).
//!
//! Grounded on `cot_events.rs::parse_datetime` (RFC3339 primary, strptime
//! fallbacks) and `ditto/from_ditto.rs::micros_to_datetime` (epoch-micros
//! reconstruction with a safe-mode fallback), generalized behind `ConversionPolicy`
//! instead of a hardcoded `eprintln!`/`unwrap_or_else` pair.

use crate::error::CotError;
use crate::policy::{ConversionPolicy, CoordinatePolicy};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Parses a CoT timestamp (`time`, `start`, or `stale`).
///
/// Accepts RFC3339 (`YYYY-MM-DDThh:mm:ss(.fff…)Z`, nanosecond precision
/// tolerated) plus two looser fallback formats CoT producers have been seen to
/// emit. In strict mode an unparseable value is fatal; in safe mode it returns
/// the Unix epoch and logs a warning.
pub fn parse_iso8601(
    field: &str,
    s: &str,
    policy: ConversionPolicy,
) -> Result<DateTime<Utc>, CotError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    match policy.coordinates {
        CoordinatePolicy::Strict => Err(CotError::InvalidDateTime {
            field: field.to_string(),
            value: s.to_string(),
        }),
        CoordinatePolicy::Safe => {
            log::warn!(
                "field '{field}' has unparseable timestamp '{s}', using epoch sentinel"
            );
            Ok(Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now))
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn to_millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

/// Microseconds since the Unix epoch, preserving sub-second precision up to µs
/// (nanoseconds are truncated).
pub fn to_micros(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_micros()
}

/// Reconstructs an ISO-8601 string from a microsecond epoch value.
///
/// Out-of-range values fall back to the Unix epoch under safe policy and are
/// fatal under strict policy, matching `from_ditto.rs::micros_to_datetime`'s
/// guard against `Utc.timestamp_opt` returning `None`/`Ambiguous`.
pub fn from_micros(micros: i64, policy: ConversionPolicy) -> Result<String, CotError> {
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000)) * 1_000;
    let dt = match Utc.timestamp_opt(secs, nanos as u32).single() {
        Some(dt) => dt,
        None => match policy.coordinates {
            CoordinatePolicy::Strict => {
                return Err(CotError::InvalidFormat(format!(
                    "microsecond epoch {micros} is out of range"
                )))
            }
            CoordinatePolicy::Safe => {
                log::warn!("microsecond epoch {micros} is out of range, using epoch sentinel");
                Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now)
            }
        },
    };
    Ok(dt.to_rfc3339_opts(SecondsFormat::Micros, true))
}
