//! Date normalization for sales exports.
//!
//! Exports mix day-first text, ISO text, month names, and raw spreadsheet
//! serials in the same column. Normalization is a total function: anything
//! unparseable becomes "unknown" and the row survives with an `Unknown`
//! month bucket.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::source::is_missing_cell;

/// Accepted date layouts in match order; day-first layouts lead because the
/// exports this pipeline sees are predominantly Indian accounting output.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d", "%d %b %Y",
    "%d %B %Y", "%Y%m%d", "%d-%b-%Y", "%d %b %y", "%d/%m/%y",
];

/// Fallback layouts for cells that carry a timestamp alongside the date.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Month bucket used when a row's date could not be parsed.
pub const UNKNOWN_MONTH_KEY: &str = "Unknown";

/// Parses a raw date cell, returning `None` for blanks, sentinels, and
/// anything unrecognizable. Never fails.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if is_missing_cell(trimmed) {
        return None;
    }

    // Exports that funnel spreadsheet dates through text columns deliver
    // them as bare serials like 45295.
    if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(serial) = trimmed.parse::<i64>() {
            return serial_to_date(serial);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(parsed);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(parsed.date());
        }
    }

    // Last resort for trailing annotations: retry the date layouts on the
    // first whitespace-delimited token.
    let first_token = trimmed.split_whitespace().next()?;
    if first_token != trimmed {
        for fmt in DATE_FORMATS {
            if let Ok(parsed) = NaiveDate::parse_from_str(first_token, fmt) {
                return Some(parsed);
            }
        }
    }
    None
}

/// Day counts in spreadsheet serials are offsets from 1899-12-30.
fn serial_to_date(serial: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial)))
}

/// Derives the `YYYY-MM` month bucket, or the `Unknown` sentinel when the
/// date did not parse.
pub fn month_key(date: Option<&NaiveDate>) -> String {
    match date {
        Some(d) => format!("{}-{:02}", d.year(), d.month()),
        None => UNKNOWN_MONTH_KEY.to_string(),
    }
}

/// Renders a date for summaries in the day-first layout uploaders expect.
pub fn display_date(date: &NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
