//! Day-granular date handling
//!
//! Every event date is normalized to 00:00:00 UTC before it is compared or
//! stored, so two events recorded on the same day compare equal no matter
//! what time of day the caller supplied.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

/// Days from breeding to the expected kindling.
pub const GESTATION_DAYS: i64 = 30;

/// Days from kindling to weaning.
pub const WEANING_DAYS: i64 = 28;

/// Minimum age in days for breeding eligibility.
pub const MATURITY_DAYS: i64 = 112;

/// Upper age bound (inclusive) of the Kit band.
pub const KIT_MAX_DAYS: i64 = 56;

/// Upper age bound (inclusive) of the Adult band.
pub const ADULT_MAX_DAYS: i64 = 365;

/// Window used by the "recently sick" and feed consumption reports.
pub const REPORT_WINDOW_DAYS: i64 = 30;

/// Truncates a timestamp to the start of its UTC day.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let day = at.date_naive();
    Utc.from_utc_datetime(&day.and_time(NaiveTime::default()))
}

/// Adds whole days to a normalized date.
///
/// `None` when the result falls outside the representable range.
pub fn checked_add_days(at: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    start_of_day(at).checked_add_signed(Duration::try_days(days)?)
}

/// Adds whole days to a normalized date, clamping at the ends of the
/// representable range.
pub fn add_days(at: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    checked_add_days(at, days).unwrap_or(if days < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Whole days elapsed from `from` to `to`, both normalized first.
///
/// Negative when `to` precedes `from`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (start_of_day(to) - start_of_day(from)).num_days()
}

/// Builds a normalized date from calendar parts.
///
/// Returns `None` for impossible dates.
pub fn ymd(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// Normalizes an optional date.
pub fn normalize_opt(at: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    at.map(start_of_day)
}
