//! Quota window arithmetic.
//!
//! Windows are half-open intervals `[window_start, reset_at)` in UTC: an
//! event stamped exactly at the start instant belongs to the new window.
//! Weekly windows are a fixed seven days from the configured week-start
//! day; monthly windows follow calendar month boundaries, so their absolute
//! duration varies with the month length.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use crate::plan::WindowKind;

/// Compute the start of the active window containing `now`.
///
/// `week_start` only matters for [`WindowKind::Weekly`]: the start is the
/// most recent occurrence of that day, truncated to midnight UTC. Monthly
/// windows start on the first of the current calendar month, midnight UTC.
#[must_use]
pub fn window_start(kind: WindowKind, now: DateTime<Utc>, week_start: Weekday) -> DateTime<Utc> {
    let today = now.date_naive();
    let start_date = match kind {
        WindowKind::Weekly => {
            let days_back = (today.weekday().num_days_from_monday() + 7
                - week_start.num_days_from_monday())
                % 7;
            today - Duration::days(i64::from(days_back))
        }
        WindowKind::Monthly => today.with_day(1).expect("every month has a day 1"),
    };
    start_date.and_time(NaiveTime::MIN).and_utc()
}

/// Compute the end of the window beginning at `start` — the first instant
/// of the next window.
///
/// Weekly windows end exactly 7×24h later; monthly windows end on the first
/// of the next calendar month, so Februarys are shorter than Julys by
/// design.
#[must_use]
pub fn reset_at(kind: WindowKind, start: DateTime<Utc>) -> DateTime<Utc> {
    match kind {
        WindowKind::Weekly => start + Duration::days(7),
        WindowKind::Monthly => {
            let date = start.date_naive();
            let (year, month) = if date.month() == 12 {
                (date.year() + 1, 1)
            } else {
                (date.year(), date.month() + 1)
            };
            NaiveDate::from_ymd_opt(year, month, 1)
                .expect("first of month is always a valid date")
                .and_time(NaiveTime::MIN)
                .and_utc()
        }
    }
}
