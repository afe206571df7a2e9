//! Local date-time handling shared by storage and wire formats.
//!
//! # Invariants
//! - Timestamps are timezone-less local date-times with second precision.
//! - Canonical text form is `yyyy-MM-ddTHH:mm:ss`.

use chrono::{Local, NaiveDateTime, ParseResult, Timelike};

/// Local date-time carried by `Case::created_date` and `Task::due_date`.
pub type Timestamp = NaiveDateTime;

/// Canonical text form used on the wire and in storage.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parses an ISO-8601 local date-time.
///
/// Accepts second precision with optional fraction, and minute precision.
/// The result is truncated to whole seconds.
pub fn parse_timestamp(value: &str) -> ParseResult<Timestamp> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, SECONDS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, MINUTES_FORMAT))
        .map(truncate_to_seconds)
}

/// Formats a timestamp in canonical `yyyy-MM-ddTHH:mm:ss` form.
pub fn format_timestamp(value: &Timestamp) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time, truncated to whole seconds.
pub fn now_local() -> Timestamp {
    truncate_to_seconds(Local::now().naive_local())
}

/// Drops sub-second precision.
pub fn truncate_to_seconds(value: Timestamp) -> Timestamp {
    value.with_nanosecond(0).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, parse_timestamp};

    #[test]
    fn parses_second_precision_and_formats_back() {
        let parsed = parse_timestamp("2025-03-14T09:26:53").unwrap();
        assert_eq!(format_timestamp(&parsed), "2025-03-14T09:26:53");
    }

    #[test]
    fn fractional_seconds_are_truncated() {
        let parsed = parse_timestamp("2025-03-14T09:26:53.589793").unwrap();
        assert_eq!(format_timestamp(&parsed), "2025-03-14T09:26:53");
    }

    #[test]
    fn minute_precision_is_accepted() {
        let parsed = parse_timestamp("2025-03-14T09:26").unwrap();
        assert_eq!(format_timestamp(&parsed), "2025-03-14T09:26:00");
    }

    #[test]
    fn date_only_and_garbage_are_rejected() {
        assert!(parse_timestamp("2025-03-14").is_err());
        assert!(parse_timestamp("tomorrow").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
