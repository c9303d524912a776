//! Date parsing for the request payload and date-range formatting for the
//! rendered document.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};

/// Shown in place of a missing end date.
pub const OPEN_ENDED: &str = "Present";

/// Parses an RFC 3339 timestamp (as produced by a browser `Date`) or a plain
/// `YYYY-MM-DD` date. Timestamps keep the calendar date of their own offset.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Serde adapter for optional date fields: `null`, absent, and `""` all mean
/// "not set"; anything else must parse.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid date '{value}', expected an RFC 3339 timestamp or YYYY-MM-DD"
            ))
        }),
    }
}

/// "Jan 2020"
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Renders `"<from> - <to>"`. A missing start leaves the left side empty; a
/// missing end always reads "Present".
pub fn format_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    let from = from.map(format_month_year).unwrap_or_default();
    let to = to
        .map(format_month_year)
        .unwrap_or_else(|| OPEN_ENDED.to_string());
    format!("{from} - {to}")
}
