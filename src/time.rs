//! Timestamp parsing and integer-minute offset arithmetic.
//!
//! All domain logic downstream of the Mapper operates on signed integer
//! minutes relative to a per-request reference instant; this module is the
//! only place that touches wall-clock time.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::MapperError;

/// Parse an ISO-8601 timestamp, accepting a trailing `Z` or an explicit UTC
/// offset, and normalize it to UTC.
pub fn parse_utc(value: &str) -> Result<DateTime<Utc>, MapperError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| MapperError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Render a UTC timestamp as an ISO-8601 string with a trailing `Z`.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert the delta between two timestamps into rounded integer minutes,
/// using half-to-even (banker's) rounding. Negative offsets (target before
/// reference) are preserved.
pub fn minutes_between(reference: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    let seconds = (target - reference).num_milliseconds() as f64 / 1000.0;
    round_half_to_even(seconds / 60.0)
}

/// Add a signed integer-minute offset to a reference instant.
pub fn add_minutes(reference: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    reference + chrono::Duration::minutes(minutes)
}

/// Round `x` to the nearest integer, breaking exact `.5` ties towards the
/// nearest even integer.
fn round_half_to_even(x: f64) -> i64 {
    let floor = x.floor();
    let diff = x - floor;
    let floor_i = floor as i64;
    if diff < 0.5 {
        floor_i
    } else if diff > 0.5 {
        floor_i + 1
    } else if floor_i % 2 == 0 {
        floor_i
    } else {
        floor_i + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trailing_z() {
        let dt = parse_utc("2024-01-01T12:00:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn parses_explicit_offset() {
        let dt = parse_utc("2024-01-01T14:00:00+02:00").unwrap();
        assert_eq!(dt, parse_utc("2024-01-01T12:00:00Z").unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_utc("not-a-timestamp").is_err());
    }

    #[test]
    fn minutes_between_whole_minutes_round_trips() {
        let reference = parse_utc("2024-01-01T12:00:00Z").unwrap();
        let target = parse_utc("2024-01-01T12:10:00Z").unwrap();
        let offset = minutes_between(reference, target);
        assert_eq!(offset, 10);
        assert_eq!(add_minutes(reference, offset), target);
    }

    #[test]
    fn negative_offsets_are_preserved() {
        let reference = parse_utc("2024-01-01T12:00:00Z").unwrap();
        let target = parse_utc("2024-01-01T11:30:00Z").unwrap();
        assert_eq!(minutes_between(reference, target), -30);
    }

    #[test]
    fn half_to_even_rounding() {
        assert_eq!(round_half_to_even(2.5), 2);
        assert_eq!(round_half_to_even(3.5), 4);
        assert_eq!(round_half_to_even(-2.5), -2);
    }
}
