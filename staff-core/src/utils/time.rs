//! Time Helpers
//!
//! All persisted instants are Unix-epoch milliseconds (`i64`) and all
//! calendar dates are normalized to UTC midnight before storage or
//! comparison, so same-day marks collide regardless of the caller's
//! timezone offset. Date -> millis conversion happens at the service
//! layer; repositories only ever see `i64`.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::{AppError, AppResult};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// UTC midnight of a calendar date -> Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// Normalize an arbitrary instant to the UTC midnight of its date
pub fn normalize_to_utc_midnight(millis: i64) -> i64 {
    millis.div_euclid(MILLIS_PER_DAY) * MILLIS_PER_DAY
}

/// Millis -> UTC calendar date
pub fn date_of_millis(millis: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// Calendar month window as `[start, end)` Unix millis
///
/// `start` is UTC midnight of the first day, `end` is UTC midnight of the
/// first day of the following month, so the last day remains inclusive
/// under `date < end` queries.
pub fn month_window(month: u32, year: i32) -> AppResult<(i64, i64)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid month/year: {}/{}", month, year)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::validation(format!("Invalid month/year: {}/{}", month, year)))?;
    Ok((day_start_millis(first), day_start_millis(next)))
}

/// Month and year of an instant (UTC)
pub fn month_year_of(millis: i64) -> (u32, i32) {
    let date = date_of_millis(millis);
    (date.month(), date.year())
}
