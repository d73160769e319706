//! Expiry arithmetic.
//!
//! Every calculation is UTC-normalized: an expiry date means 00:00 UTC of that
//! day and "today" is the UTC calendar date of the request's `now`. Callers
//! capture `now` once per request and pass it to every helper here.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::errors::ServiceError;

/// Inclusive look-ahead for the "expiring soon" predicate.
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole days from `now` until `expiry` at midnight, floored.
///
/// Negative values mean the date has passed; `-1` covers the day of expiry
/// itself once midnight is behind us.
pub fn days_left(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let delta = expiry.and_time(NaiveTime::MIN).and_utc() - now;
    let days = delta.num_days();
    // num_days truncates toward zero
    if delta < Duration::days(days) { days - 1 } else { days }
}

/// Last calendar date that still counts as expiring soon.
pub fn expiring_cutoff(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() + Duration::days(EXPIRING_WINDOW_DAYS)
}

pub fn parse_expiry_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ServiceError::InvalidDateFormat(raw.to_string()))
}

pub fn render_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn render_timestamp<Tz: chrono::TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
