//! Parsing and formatting of `crash_time` strings.
//!
//! The ingestion side writes `YYYY-MM-DD HH:MM:SS`, but older rows and test
//! fixtures also carry ISO-8601 / RFC 3339 values. Everything is reduced to
//! a naive wall-clock time; offsets are converted to UTC first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::LocalTimestamp;

/// Formats tried, in order, for offset-less timestamps.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Display format for timestamps in the dashboard.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used by the ingestion side when writing `crash_time`.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored `crash_time`. Returns `None` for anything unrecognised.
pub fn parse_crash_time(raw: &str) -> Option<LocalTimestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

/// Human-readable form of a stored `crash_time`.
///
/// Missing values render as `Unknown`; unparseable values are shown as-is.
pub fn format_crash_time(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "Unknown".to_string(),
        Some(s) => match parse_crash_time(s) {
            Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
            None => s.to_string(),
        },
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `23:59:59.999` on `date`, the inclusive upper bound of a day.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_milli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_storage_format() {
        assert_eq!(
            parse_crash_time("2024-01-15 10:30:00"),
            Some(at(2024, 1, 15, 10, 30, 0))
        );
    }

    #[test]
    fn parses_iso_without_offset() {
        assert_eq!(
            parse_crash_time("2024-01-15T10:30:00.250"),
            Some(at(2024, 1, 15, 10, 30, 0) + chrono::Duration::milliseconds(250))
        );
    }

    #[test]
    fn parses_rfc3339_as_utc() {
        assert_eq!(
            parse_crash_time("2024-01-15T10:30:00+05:30"),
            Some(at(2024, 1, 15, 5, 0, 0))
        );
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(parse_crash_time("2024-01-15"), Some(at(2024, 1, 15, 0, 0, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_crash_time("yesterday"), None);
        assert_eq!(parse_crash_time(""), None);
    }

    #[test]
    fn formats_known_unknown_and_raw() {
        assert_eq!(format_crash_time(Some("2024-01-15T10:30:00")), "2024-01-15 10:30:00");
        assert_eq!(format_crash_time(None), "Unknown");
        assert_eq!(format_crash_time(Some("  ")), "Unknown");
        assert_eq!(format_crash_time(Some("soon")), "soon");
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            end_of_day(date).format("%H:%M:%S%.3f").to_string(),
            "23:59:59.999"
        );
    }
}
