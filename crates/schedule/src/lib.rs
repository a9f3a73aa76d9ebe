//! `schedule` crate — recurrence rules, next-fire computation, and the
//! scheduled-task runner.

pub mod calculator;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod runner;

pub use calculator::next_run;
pub use error::ScheduleError;
pub use evaluator::{CronEvaluator, CronExpressionEvaluator};
pub use models::{Recurrence, ScheduledTask};
pub use runner::{ScheduledTaskRunner, TaskStore};
