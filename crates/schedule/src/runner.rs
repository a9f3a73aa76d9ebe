//! Scheduled-task firing.
//!
//! The runner claims a due task through the store's conditional write, so two
//! runners observing the same `nextRun` cannot both fire it. Collaborator
//! failures are logged and swallowed — one failing recurrence must not stall
//! the schedule.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Map;
use tracing::{error, info, warn};
use uuid::Uuid;

use actions::ActionDispatcher;

use crate::calculator;
use crate::evaluator::CronEvaluator;
use crate::models::ScheduledTask;

/// Persistence capability for scheduled tasks.
///
/// Defined here (in the schedule crate) so the runner and persistence
/// implementations can share it without a circular dependency.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ScheduledTask>>;
    async fn put(&self, task: ScheduledTask) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn list(&self) -> anyhow::Result<Vec<ScheduledTask>>;

    /// Conditional write: atomically swing `next_run` from `expected` to
    /// `new`. Returns false when the stored value no longer matches
    /// `expected` — another runner claimed the task first.
    async fn swap_next_run(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> anyhow::Result<bool>;
}

/// Fires due scheduled tasks and keeps their `lastRun`/`nextRun` bookkeeping.
pub struct ScheduledTaskRunner {
    store: Arc<dyn TaskStore>,
    dispatcher: Arc<ActionDispatcher>,
    cron: Arc<dyn CronEvaluator>,
}

impl ScheduledTaskRunner {
    pub fn new(
        store: Arc<dyn TaskStore>,
        dispatcher: Arc<ActionDispatcher>,
        cron: Arc<dyn CronEvaluator>,
    ) -> Self {
        Self { store, dispatcher, cron }
    }

    /// Fire the task once: perform its action, stamp `lastRun`, reschedule.
    ///
    /// Returns false — leaving the task untouched — when the task cannot be
    /// loaded, is deactivated, or was claimed by a concurrent runner first.
    /// Returns true once the task fired, even if the action collaborator
    /// failed; that failure is logged, never propagated.
    pub async fn fire(&self, task_id: Uuid) -> bool {
        let task = match self.store.get(task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => {
                warn!(%task_id, "scheduled task not found, skipping fire");
                return false;
            }
            Err(err) => {
                error!(%task_id, "failed to load scheduled task: {err}");
                return false;
            }
        };

        if !task.is_active {
            info!(%task_id, "scheduled task is deactivated, skipping fire");
            return false;
        }

        // Claim before acting: a concurrent runner that saw the same nextRun
        // loses the swap and backs off.
        match self.store.swap_next_run(task_id, task.next_run, None).await {
            Ok(true) => {}
            Ok(false) => {
                info!(%task_id, "scheduled task already claimed, skipping fire");
                return false;
            }
            Err(err) => {
                error!(%task_id, "failed to claim scheduled task: {err}");
                return false;
            }
        }

        let now = Utc::now();

        if let Err(err) = self.dispatcher.dispatch(&task.action, &Map::new()).await {
            // Swallowed on purpose: the task must still be rescheduled.
            error!(%task_id, "scheduled action failed: {err}");
        }

        let mut fired = task;
        fired.last_run = Some(now);
        fired.next_run = if fired.recurrence.is_once() {
            None
        } else {
            match calculator::next_run(&fired.recurrence, now, self.cron.as_ref()) {
                Ok(next) => Some(next),
                Err(err) => {
                    // An uncomputable rule cannot be rescheduled; park the
                    // task until the rule is fixed.
                    error!(%task_id, "failed to reschedule: {err}");
                    None
                }
            }
        };

        if let Err(err) = self.store.put(fired).await {
            error!(%task_id, "failed to persist fired task: {err}");
        }

        true
    }
}
