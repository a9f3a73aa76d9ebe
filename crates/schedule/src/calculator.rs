//! Next-fire computation for recurrence rules.
//!
//! Pure functions over (`Recurrence`, now). Every branch returns an instant
//! strictly after `now` — a calculator handing back the present or the past
//! would make the runner spin.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::ScheduleError;
use crate::evaluator::CronEvaluator;
use crate::models::Recurrence;

/// Compute the instant the rule fires next, strictly after `now`.
///
/// `custom` rules delegate to the cron collaborator; everything else is
/// plain calendar arithmetic in UTC.
pub fn next_run(
    rule: &Recurrence,
    now: DateTime<Utc>,
    cron: &dyn CronEvaluator,
) -> Result<DateTime<Utc>, ScheduleError> {
    match rule {
        // A one-shot behaves like a daily rule for its single computation:
        // today at `time` if that is still ahead, otherwise tomorrow.
        Recurrence::Once { time } | Recurrence::Daily { time } => {
            Ok(next_daily(parse_time(time)?, now))
        }
        Recurrence::Weekly { days, time } => next_weekly(days, optional_time(time)?, now),
        Recurrence::Monthly { date, time } => next_monthly(*date, optional_time(time)?, now),
        Recurrence::Custom { expression } => cron.next_occurrence(expression, now),
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(raw.to_owned()))
}

/// Weekly and monthly rules default to midnight when no time is configured.
fn optional_time(raw: &Option<String>) -> Result<NaiveTime, ScheduleError> {
    match raw {
        Some(time) => parse_time(time),
        None => Ok(NaiveTime::MIN),
    }
}

fn next_daily(time: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(time).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

fn next_weekly(
    days: &[u32],
    time: NaiveTime,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let Some(&first) = days.iter().min() else {
        return Err(ScheduleError::EmptyWeekdaySet);
    };
    if let Some(&day) = days.iter().find(|&&d| d > 6) {
        return Err(ScheduleError::InvalidWeekday(day));
    }

    // Smallest configured day strictly after today's weekday; none left this
    // week means wrapping to the smallest configured day next week. Today is
    // never a candidate, so the result is always ahead of `now`.
    let today = now.date_naive().weekday().num_days_from_sunday();
    let delta = days
        .iter()
        .copied()
        .filter(|&d| d > today)
        .min()
        .map_or(i64::from(7 - today + first), |day| i64::from(day - today));

    Ok((now.date_naive() + Duration::days(delta)).and_time(time).and_utc())
}

fn next_monthly(
    date: u32,
    time: NaiveTime,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    if date == 0 || date > 31 {
        return Err(ScheduleError::InvalidMonthDay(date));
    }

    let today = now.date_naive();
    let candidate = clamped_day(today.year(), today.month(), date)
        .and_time(time)
        .and_utc();
    if candidate > now {
        return Ok(candidate);
    }

    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    Ok(clamped_day(year, month, date).and_time(time).and_utc())
}

/// Day-of-month clamped to the target month's length (the 31st in February
/// becomes the 28th or 29th).
fn clamped_day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| last_day_of_month(year, month))
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is always a valid date")
        - Duration::days(1)
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// A Tuesday.
    fn tuesday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 4, 8, 0, 0).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    /// Evaluator stand-in that fails the test if a non-custom rule consults it.
    struct NoCron;
    impl CronEvaluator for NoCron {
        fn next_occurrence(
            &self,
            _expression: &str,
            _after: DateTime<Utc>,
        ) -> Result<DateTime<Utc>, ScheduleError> {
            panic!("cron evaluator must not be consulted for calendar rules");
        }
    }

    fn compute(rule: &Recurrence, now: DateTime<Utc>) -> DateTime<Utc> {
        let next = next_run(rule, now, &NoCron).expect("rule should compute");
        assert!(next > now, "next run must be strictly in the future");
        next
    }

    #[test]
    fn daily_uses_today_while_the_time_is_still_ahead() {
        let rule = Recurrence::Daily { time: "09:00".to_owned() };
        assert_eq!(compute(&rule, tuesday_morning()), at(2026, 8, 4, 9, 0));
    }

    #[test]
    fn daily_rolls_to_tomorrow_once_the_time_has_passed() {
        let rule = Recurrence::Daily { time: "09:00".to_owned() };
        assert_eq!(compute(&rule, at(2026, 8, 4, 10, 0)), at(2026, 8, 5, 9, 0));
    }

    #[test]
    fn daily_at_the_exact_configured_instant_rolls_forward() {
        let rule = Recurrence::Daily { time: "09:00".to_owned() };
        assert_eq!(compute(&rule, at(2026, 8, 4, 9, 0)), at(2026, 8, 5, 9, 0));
    }

    #[test]
    fn once_computes_like_daily() {
        let rule = Recurrence::Once { time: "23:30".to_owned() };
        assert_eq!(compute(&rule, tuesday_morning()), at(2026, 8, 4, 23, 30));
    }

    #[test]
    fn weekly_picks_the_next_configured_day_this_week() {
        // Tuesday, days = [Monday, Wednesday] → Wednesday this week.
        let rule = Recurrence::Weekly { days: vec![1, 3], time: Some("09:00".to_owned()) };
        assert_eq!(compute(&rule, at(2026, 8, 4, 10, 0)), at(2026, 8, 5, 9, 0));
    }

    #[test]
    fn weekly_wraps_to_the_smallest_day_next_week() {
        // Thursday, days = [Monday, Wednesday] → Monday next week.
        let rule = Recurrence::Weekly { days: vec![1, 3], time: Some("09:00".to_owned()) };
        assert_eq!(compute(&rule, at(2026, 8, 6, 12, 0)), at(2026, 8, 10, 9, 0));
    }

    #[test]
    fn weekly_never_fires_on_the_current_day() {
        // Tuesday with only Tuesday configured wraps a full week.
        let rule = Recurrence::Weekly { days: vec![2], time: Some("23:59".to_owned()) };
        assert_eq!(compute(&rule, at(2026, 8, 4, 0, 0)), at(2026, 8, 11, 23, 59));
    }

    #[test]
    fn weekly_defaults_to_midnight() {
        let rule = Recurrence::Weekly { days: vec![3], time: None };
        assert_eq!(compute(&rule, tuesday_morning()), at(2026, 8, 5, 0, 0));
    }

    #[test]
    fn weekly_rejects_empty_and_out_of_range_days() {
        let empty = Recurrence::Weekly { days: vec![], time: None };
        assert_eq!(
            next_run(&empty, tuesday_morning(), &NoCron),
            Err(ScheduleError::EmptyWeekdaySet)
        );

        let out_of_range = Recurrence::Weekly { days: vec![1, 7], time: None };
        assert_eq!(
            next_run(&out_of_range, tuesday_morning(), &NoCron),
            Err(ScheduleError::InvalidWeekday(7))
        );
    }

    #[test]
    fn monthly_uses_this_month_while_the_date_is_ahead() {
        let rule = Recurrence::Monthly { date: 15, time: Some("08:00".to_owned()) };
        assert_eq!(compute(&rule, tuesday_morning()), at(2026, 8, 15, 8, 0));
    }

    #[test]
    fn monthly_rolls_to_next_month_once_passed() {
        let rule = Recurrence::Monthly { date: 1, time: Some("08:00".to_owned()) };
        assert_eq!(compute(&rule, tuesday_morning()), at(2026, 9, 1, 8, 0));
    }

    #[test]
    fn monthly_clamps_to_short_months() {
        // January 31st has passed; February clamps to the 28th in 2026.
        let rule = Recurrence::Monthly { date: 31, time: Some("06:00".to_owned()) };
        assert_eq!(compute(&rule, at(2026, 1, 31, 12, 0)), at(2026, 2, 28, 6, 0));
    }

    #[test]
    fn monthly_wraps_the_year_in_december() {
        let rule = Recurrence::Monthly { date: 5, time: None };
        assert_eq!(compute(&rule, at(2026, 12, 20, 0, 0)), at(2027, 1, 5, 0, 0));
    }

    #[test]
    fn monthly_rejects_impossible_dates() {
        for date in [0, 32] {
            let rule = Recurrence::Monthly { date, time: None };
            assert_eq!(
                next_run(&rule, tuesday_morning(), &NoCron),
                Err(ScheduleError::InvalidMonthDay(date))
            );
        }
    }

    #[test]
    fn malformed_times_are_rejected() {
        let rule = Recurrence::Daily { time: "9am".to_owned() };
        assert_eq!(
            next_run(&rule, tuesday_morning(), &NoCron),
            Err(ScheduleError::InvalidTime("9am".to_owned()))
        );
    }

    #[test]
    fn custom_rules_delegate_to_the_evaluator() {
        struct FixedCron;
        impl CronEvaluator for FixedCron {
            fn next_occurrence(
                &self,
                expression: &str,
                after: DateTime<Utc>,
            ) -> Result<DateTime<Utc>, ScheduleError> {
                assert_eq!(expression, "0 0 6 * * *");
                Ok(after + Duration::hours(1))
            }
        }

        let rule = Recurrence::Custom { expression: "0 0 6 * * *".to_owned() };
        let now = tuesday_morning();
        assert_eq!(next_run(&rule, now, &FixedCron), Ok(now + Duration::hours(1)));
    }
}
