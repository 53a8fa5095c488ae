//! Time utilities — date parsing and UTC day bounds
//!
//! Date-to-timestamp conversion happens at the API handler layer;
//! repositories only receive `i64` Unix millis.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};

use shared::util::MILLIS_PER_DAY;
use shared::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Start of the UTC calendar day containing the date → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    Utc.with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0)
        .single()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// End of the UTC calendar day (last millisecond) → Unix millis
pub fn day_end_millis(date: NaiveDate) -> i64 {
    day_start_millis(date) + MILLIS_PER_DAY - 1
}

/// Resolve an optional `[from, to]` date-range query into millis bounds
///
/// Defaults to the trailing 30 days ending now when both are absent;
/// a present bound is honored on its own.
pub fn resolve_range(from: Option<&str>, to: Option<&str>) -> AppResult<(i64, i64)> {
    let now = shared::util::now_millis();
    let from_ms = match from {
        Some(d) => day_start_millis(parse_date(d)?),
        None => now - 30 * MILLIS_PER_DAY,
    };
    let to_ms = match to {
        Some(d) => day_end_millis(parse_date(d)?),
        None => now,
    };
    if from_ms > to_ms {
        return Err(AppError::validation("Range start is after range end"));
    }
    Ok((from_ms, to_ms))
}
