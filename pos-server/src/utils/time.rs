//! Time helpers
//!
//! Timestamps persist as RFC3339 UTC strings with millisecond precision,
//! so lexicographic order equals chronological order. Date query params
//! normalize to the same format at the handler seam.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::{AppError, AppResult};

/// Current time as a sortable RFC3339 string ("2026-08-30T12:00:00.123Z")
pub fn now_rfc3339() -> String {
    format_rfc3339(Utc::now())
}

/// Format a timestamp in the canonical storage format
pub fn format_rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date query param (RFC3339 or YYYY-MM-DD) into the canonical
/// storage format. A bare date maps to start-of-day.
pub fn parse_date_param(value: &str) -> AppResult<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(format_rfc3339(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", value)))?;
    let dt = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    Ok(format_rfc3339(dt))
}

/// Parse an end-of-range date param. A bare date maps to end-of-day so
/// the bound stays inclusive.
pub fn parse_end_date_param(value: &str) -> AppResult<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(format_rfc3339(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", value)))?;
    let dt = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
    Ok(format_rfc3339(dt))
}
