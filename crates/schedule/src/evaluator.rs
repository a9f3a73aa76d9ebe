//! Pluggable cron-expression evaluation for `custom` recurrence rules.
//!
//! The exact cron grammar is the evaluator's concern, not the calculator's;
//! the only contract is an instant strictly after the one passed in.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;

use crate::error::ScheduleError;

/// Cron collaborator contract.
pub trait CronEvaluator: Send + Sync {
    fn next_occurrence(
        &self,
        expression: &str,
        after: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ScheduleError>;
}

/// Default evaluator backed by the `cron` crate's schedule parser
/// (seconds-resolution expressions, e.g. `"0 30 9 * * Mon"`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CronExpressionEvaluator;

impl CronEvaluator for CronExpressionEvaluator {
    fn next_occurrence(
        &self,
        expression: &str,
        after: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ScheduleError> {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            ScheduleError::InvalidCronExpression {
                expression: expression.to_owned(),
                reason: e.to_string(),
            }
        })?;

        schedule
            .after(&after)
            .next()
            .ok_or_else(|| ScheduleError::CronExhausted(expression.to_owned()))
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn next_occurrence_is_strictly_after_the_given_instant() {
        let after = Utc.with_ymd_and_hms(2026, 8, 4, 10, 0, 0).unwrap();
        let next = CronExpressionEvaluator
            .next_occurrence("0 0 9 * * *", after)
            .expect("valid expression");

        assert_eq!(next, Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap());
        assert!(next > after);
    }

    #[test]
    fn same_day_occurrence_is_used_when_still_ahead() {
        let after = Utc.with_ymd_and_hms(2026, 8, 4, 7, 30, 0).unwrap();
        let next = CronExpressionEvaluator
            .next_occurrence("0 0 9 * * *", after)
            .expect("valid expression");

        assert_eq!(next, Utc.with_ymd_and_hms(2026, 8, 4, 9, 0, 0).unwrap());
    }

    #[test]
    fn malformed_expression_is_rejected() {
        let err = CronExpressionEvaluator
            .next_occurrence("not a cron line", Utc::now())
            .expect_err("should reject");

        assert!(matches!(err, ScheduleError::InvalidCronExpression { .. }));
    }
}
