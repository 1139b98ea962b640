//! Lenient parsing of the wire formats task exports use for dates and times.
//!
//! Every parser returns `None` on failure; callers treat an unparseable
//! value exactly like an absent one.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const CLOCK_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a wall-clock time such as `09:30` or `09:30:00`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parse an ISO-ish datetime.
///
/// RFC 3339 values with an offset keep their wall-clock reading; the offset
/// is dropped so that dates compare the way the user wrote them.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
