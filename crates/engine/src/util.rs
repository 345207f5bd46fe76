//! Date and percentage helpers shared across ops.

use chrono::{Datelike, NaiveDate};

/// Display bucket for a ledger date, e.g. "November 2025".
pub fn time_group(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// `(year, month)` of the month immediately following `date`, year-adjusted
/// (December 2025 → January 2026).
pub fn next_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    }
}

/// True when `candidate` falls in the month immediately following `date`.
///
/// Goal-category matching is deliberately look-ahead-by-one-period: goals are
/// pre-funded for the next period and a transaction posted now draws against
/// that upcoming allocation.
pub fn is_next_month(date: NaiveDate, candidate: NaiveDate) -> bool {
    (candidate.year(), candidate.month()) == next_month(date)
}

/// True when `candidate` is in the same month as `date` or the one after.
pub fn is_current_or_next_month(date: NaiveDate, candidate: NaiveDate) -> bool {
    (candidate.year(), candidate.month()) == (date.year(), date.month())
        || is_next_month(date, candidate)
}

/// The same day one month later, clamped to the target month's length.
pub fn plus_one_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = next_month(date);
    let mut day = date.day();
    loop {
        if let Some(result) = NaiveDate::from_ymd_opt(year, month, day) {
            return result;
        }
        day -= 1;
    }
}

/// `current / target × 100`, rounded to two decimals.
///
/// A zero target makes the ratio non-finite; that case reports `0.0` rather
/// than NaN so clients always receive a number.
pub fn saving_percentage(target_minor: i64, current_minor: i64) -> f64 {
    if target_minor == 0 {
        return 0.0;
    }
    round2(current_minor as f64 / target_minor as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
