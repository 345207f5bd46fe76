//! Goal lifecycle scheduler.
//!
//! Ticks hourly and runs the engine's two period jobs: opening the next
//! period's goals on the first day of the month and closing expired goals on
//! the last. Both jobs are idempotent, so the guard here only avoids
//! re-running them on every tick within the same day.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate, Utc};

use engine::Engine;

const TICK: Duration = Duration::from_secs(60 * 60);

pub async fn run_lifecycle_scheduler(engine: Arc<Engine>) {
    let mut interval = tokio::time::interval(TICK);
    let mut last_opened: Option<NaiveDate> = None;
    let mut last_closed: Option<NaiveDate> = None;

    loop {
        interval.tick().await;
        let today = Utc::now().date_naive();

        if today.day() == 1 && last_opened != Some(today) {
            match engine.open_period_goals(today).await {
                Ok(opened) => {
                    last_opened = Some(today);
                    tracing::info!("opened {opened} saving goal(s) for {today}");
                }
                Err(err) => tracing::error!("failed to open period goals: {err}"),
            }
        }

        if is_last_day_of_month(today) && last_closed != Some(today) {
            match engine.close_expired_goals(today).await {
                Ok(closed) => {
                    last_closed = Some(today);
                    tracing::info!("closed {closed} saving goal(s) for {today}");
                }
                Err(err) => tracing::error!("failed to close expired goals: {err}"),
            }
        }
    }
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    match date.checked_add_days(Days::new(1)) {
        Some(next) => next.day() == 1,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_day_detection() {
        let cases = [
            (NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(), true),
            (NaiveDate::from_ymd_opt(2028, 2, 28).unwrap(), false),
            (NaiveDate::from_ymd_opt(2028, 2, 29).unwrap(), true),
            (NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(), true),
            (NaiveDate::from_ymd_opt(2026, 12, 30).unwrap(), false),
        ];
        for (date, expected) in cases {
            assert_eq!(is_last_day_of_month(date), expected, "{date}");
        }
    }
}
