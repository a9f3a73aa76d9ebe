//! Scheduled-task domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use actions::ActionConfig;

/// How often a scheduled task fires, tagged by `type` on the wire.
///
/// Times are wall-clock `"HH:MM"` strings and weekdays Sunday-based 0–6
/// numbers — the formats the scheduling screens already produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Recurrence {
    /// Fire a single time at the next occurrence of `time`.
    Once { time: String },
    /// Fire every day at `time`.
    Daily { time: String },
    /// Fire on each listed weekday at `time` (midnight when absent).
    Weekly {
        days: Vec<u32>,
        #[serde(default)]
        time: Option<String>,
    },
    /// Fire on the given day of the month at `time` (midnight when absent).
    Monthly {
        date: u32,
        #[serde(default)]
        time: Option<String>,
    },
    /// Fire per a cron expression, evaluated by the cron collaborator.
    Custom { expression: String },
}

impl Recurrence {
    /// `once` rules fire a single time and are never rescheduled.
    pub fn is_once(&self) -> bool {
        matches!(self, Self::Once { .. })
    }
}

/// A task on a timer: its rule, its action, and its derived fire times.
///
/// `next_run` is derived state — recomputed on creation, on rule update, and
/// after every fire (`None` once a `once` rule has fired). Deactivation
/// pauses the task without losing history; deletion is explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: Uuid,
    pub name: String,
    pub recurrence: Recurrence,
    pub action: ActionConfig,
    pub is_active: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledTask {
    /// Convenience constructor; new tasks start active with `next_run`
    /// unset until the service computes it.
    pub fn new(name: impl Into<String>, recurrence: Recurrence, action: ActionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            recurrence,
            action,
            is_active: true,
            last_run: None,
            next_run: None,
            created_at: Utc::now(),
        }
    }
}
