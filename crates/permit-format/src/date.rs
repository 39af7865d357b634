//! Long-form date formatting

use crate::NOT_AVAILABLE;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// chrono pattern for certificate dates ("January 15, 2024")
pub const DATE_FORMAT: &str = "%B %-d, %Y";

/// Datetime layouts accepted besides RFC 3339
const DATETIME_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a record date
///
/// Accepts RFC 3339 timestamps, naive ISO datetimes (with `T` or a space) and
/// plain `YYYY-MM-DD`. Timestamps keep the calendar date written in the
/// string; no timezone conversion is applied.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Format a record date for display, "N/A" when absent or unparseable
///
/// # Examples
/// ```
/// use permit_format::format_date;
/// assert_eq!(format_date(Some("2024-01-15")), "January 15, 2024");
/// assert_eq!(format_date(None), "N/A");
/// ```
pub fn format_date(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
