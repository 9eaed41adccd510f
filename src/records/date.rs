//! Date coercion for record values
//!
//! Integration dates arrive either as native date cells or as text in one
//! of a handful of spreadsheet export formats. Coercion never fails loudly:
//! anything that is not recognisably a date yields `None`.

use super::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried in order, before the date-only layouts
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only layouts; day-first for slash and dash separated dates
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Coerce a record value to a calendar date
pub fn try_parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(dt) => Some(dt.date()),
        Value::Text(text) => parse_date_str(text),
        Value::Number(_) | Value::Empty => None,
    }
}

/// Parse a textual date, returning `None` when no known layout matches
pub fn parse_date_str(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}
