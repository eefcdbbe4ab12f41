//! Timestamp utilities

use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive layouts accepted for submitted start times, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Display layouts for show start times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Saturday May, 21, 2035 at 9:30PM`
    Full,
    /// `Sat 05, 21, 2035 9:30PM`
    Medium,
}

/// Render a timestamp for display
pub fn format_datetime(value: &DateTime<Utc>, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
    };
    value.format(pattern).to_string()
}

/// Parse a submitted start time
///
/// Accepts RFC 3339 (any offset, normalized to UTC) and the naive layouts produced by
/// `datetime-local` inputs and the classic `YYYY-MM-DD HH:MM:SS` form default.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() < 4_102_444_800); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_format_full() {
        let ts = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        assert_eq!(format_datetime(&ts, DateFormat::Full), "Sunday April, 1, 2035 at 8:00PM");
    }

    #[test]
    fn test_format_medium() {
        let ts = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        assert_eq!(format_datetime(&ts, DateFormat::Medium), "Tue 05, 21, 2019 9:30PM");
    }

    #[test]
    fn test_parse_form_default_layout() {
        let parsed = parse_start_time("2019-05-21 21:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_local_layout() {
        let parsed = parse_start_time("2035-04-08T20:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2035, 4, 8, 20, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offset() {
        let parsed = parse_start_time("2019-06-15T23:00:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2019, 6, 15, 23, 0, 0).unwrap());

        let offset = parse_start_time("2019-06-15T23:00:00+02:00").unwrap();
        assert_eq!(offset, Utc.with_ymd_and_hms(2019, 6, 15, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_start_time("").is_none());
        assert!(parse_start_time("   ").is_none());
        assert!(parse_start_time("next tuesday").is_none());
        assert!(parse_start_time("2019-13-45 25:00:00").is_none());
    }
}
