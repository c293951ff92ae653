//! Date and time normalization for stored and fetched fixtures

use chrono::{NaiveDate, NaiveDateTime};

/// Canonical calendar date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format written by older versions of the dataset
pub const LEGACY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Time-of-day value meaning "unknown"
pub const PLACEHOLDER_TIME: &str = "00:00";

/// Normalize a date string to `YYYY-MM-DD`.
///
/// Accepts the canonical form, the legacy `DD/MM/YYYY` form and full ISO
/// timestamps (only the date part is kept). Anything else is returned trimmed
/// but otherwise untouched.
pub fn normalize_date(value: &str) -> String {
    let mut s = value.trim();
    if s.is_empty() {
        return String::new();
    }

    if let Some((date_part, _)) = s.split_once('T') {
        s = date_part.trim();
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return date.format(DATE_FORMAT).to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, LEGACY_DATE_FORMAT) {
        return date.format(DATE_FORMAT).to_string();
    }

    s.to_string()
}

/// Normalize a clock time to `HH:MM` by dropping any seconds part
pub fn normalize_time(value: &str) -> String {
    let s = value.trim();
    s.chars().take(5).collect()
}

/// True when the time is missing or the midnight placeholder
pub fn is_placeholder_time(time: &str) -> bool {
    let t = time.trim();
    t.is_empty() || t == PLACEHOLDER_TIME
}

/// Sort position of a stored fixture.
///
/// Unparseable date/time pairs sort first (epoch).
pub fn sort_instant(date: &str, time: &str) -> NaiveDateTime {
    let combined = format!("{date} {time}");
    for format in ["%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(&combined, format) {
            return instant;
        }
    }
    epoch()
}

fn epoch() -> NaiveDateTime {
    // NaiveDateTime's default is 1970-01-01 00:00:00
    NaiveDateTime::default()
}
