//! Schedule-level error type.

use thiserror::Error;

/// Defects in a recurrence rule, surfaced when the next fire time is
/// computed (task creation, rule update, and after every fire).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("weekly rule has no weekdays configured")]
    EmptyWeekdaySet,

    #[error("invalid weekday {0}, expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u32),

    #[error("invalid day of month {0}, expected 1 through 31")]
    InvalidMonthDay(u32),

    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("cron expression '{0}' has no future occurrence")]
    CronExhausted(String),
}
