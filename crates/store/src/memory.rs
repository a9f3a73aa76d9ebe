//! In-memory stores backed by `RwLock<HashMap>`.
//!
//! Single-process only — the CLI and the test suites use these. The
//! conditional `next_run` write is atomic under the task store's write lock,
//! which is exactly the guarantee a real backend must provide with a
//! compare-and-swap.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use engine::WorkflowDefinition;
use schedule::{ScheduledTask, TaskStore};

use crate::workflows::WorkflowStore;

/// In-memory workflow definitions keyed by id.
#[derive(Default)]
pub struct MemoryWorkflowStore {
    inner: RwLock<HashMap<Uuid, WorkflowDefinition>>,
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<WorkflowDefinition>> {
        Ok(self.inner.read().unwrap().get(&id).cloned())
    }

    async fn put(&self, workflow: WorkflowDefinition) -> anyhow::Result<()> {
        self.inner.write().unwrap().insert(workflow.id, workflow);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.inner.write().unwrap().remove(&id).is_some())
    }

    async fn list(&self) -> anyhow::Result<Vec<WorkflowDefinition>> {
        Ok(self.inner.read().unwrap().values().cloned().collect())
    }
}

/// In-memory scheduled tasks keyed by id.
#[derive(Default)]
pub struct MemoryTaskStore {
    inner: RwLock<HashMap<Uuid, ScheduledTask>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ScheduledTask>> {
        Ok(self.inner.read().unwrap().get(&id).cloned())
    }

    async fn put(&self, task: ScheduledTask) -> anyhow::Result<()> {
        self.inner.write().unwrap().insert(task.id, task);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.inner.write().unwrap().remove(&id).is_some())
    }

    async fn list(&self) -> anyhow::Result<Vec<ScheduledTask>> {
        Ok(self.inner.read().unwrap().values().cloned().collect())
    }

    async fn swap_next_run(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> anyhow::Result<bool> {
        let mut tasks = self.inner.write().unwrap();
        match tasks.get_mut(&id) {
            Some(task) if task.next_run == expected => {
                task.next_run = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
