//! `service` crate — the automation core's outward-facing operations.
//!
//! This is the seam the API/UI layers call: workflow validate-and-store,
//! execution by id, and the scheduled-task lifecycle. Everything behind it
//! (stores, collaborators, the cron evaluator) is injected as a capability.

pub mod error;

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use actions::{ActionConfig, ActionDispatcher};
use engine::{validate_workflow, ExecutionRecord, WorkflowDefinition, WorkflowExecutor};
use schedule::{
    calculator, CronEvaluator, Recurrence, ScheduledTask, ScheduledTaskRunner, TaskStore,
};
use store::WorkflowStore;

pub use error::ServiceError;

/// Partial update applied to a scheduled task; absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTaskUpdate {
    pub name: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub action: Option<ActionConfig>,
    pub is_active: Option<bool>,
}

/// The automation core behind one façade.
pub struct AutomationService {
    workflows: Arc<dyn WorkflowStore>,
    tasks: Arc<dyn TaskStore>,
    executor: WorkflowExecutor,
    runner: ScheduledTaskRunner,
    cron: Arc<dyn CronEvaluator>,
}

impl AutomationService {
    pub fn new(
        workflows: Arc<dyn WorkflowStore>,
        tasks: Arc<dyn TaskStore>,
        dispatcher: Arc<ActionDispatcher>,
        cron: Arc<dyn CronEvaluator>,
    ) -> Self {
        Self {
            workflows,
            tasks: tasks.clone(),
            executor: WorkflowExecutor::new(dispatcher.clone()),
            runner: ScheduledTaskRunner::new(tasks, dispatcher, cron.clone()),
            cron,
        }
    }

    // -----------------------------------------------------------------------
    // Workflows
    // -----------------------------------------------------------------------

    /// Validate and persist a workflow definition.
    pub async fn create_workflow(
        &self,
        workflow: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, ServiceError> {
        validate_workflow(&workflow)?;
        self.workflows.put(workflow.clone()).await?;
        info!(workflow_id = %workflow.id, "workflow stored");
        Ok(workflow)
    }

    /// Replace a stored definition. Any step mutation is re-validated before
    /// the old version is overwritten.
    pub async fn update_workflow(
        &self,
        id: Uuid,
        mut workflow: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, ServiceError> {
        if self.workflows.get(id).await?.is_none() {
            return Err(ServiceError::WorkflowNotFound(id));
        }
        workflow.id = id;
        validate_workflow(&workflow)?;
        self.workflows.put(workflow.clone()).await?;
        Ok(workflow)
    }

    pub async fn get_workflow(&self, id: Uuid) -> Result<WorkflowDefinition, ServiceError> {
        self.workflows
            .get(id)
            .await?
            .ok_or(ServiceError::WorkflowNotFound(id))
    }

    pub async fn delete_workflow(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.workflows.delete(id).await?)
    }

    /// Execute a stored workflow against `initial_data`.
    ///
    /// Unknown and deactivated definitions are refused before the run
    /// starts, as are structurally invalid ones; failures *during* the run
    /// come back inside the record, not as an error.
    pub async fn execute(
        &self,
        workflow_id: Uuid,
        initial_data: Map<String, Value>,
    ) -> Result<ExecutionRecord, ServiceError> {
        let workflow = self
            .workflows
            .get(workflow_id)
            .await?
            .ok_or(ServiceError::WorkflowNotFound(workflow_id))?;
        if !workflow.is_active {
            return Err(ServiceError::WorkflowInactive(workflow_id));
        }
        validate_workflow(&workflow)?;

        Ok(self.executor.execute(&workflow, initial_data).await)
    }

    // -----------------------------------------------------------------------
    // Scheduled tasks
    // -----------------------------------------------------------------------

    /// Persist a new scheduled task with its first `nextRun` computed.
    pub async fn create_scheduled_task(
        &self,
        mut task: ScheduledTask,
    ) -> Result<ScheduledTask, ServiceError> {
        task.next_run = Some(calculator::next_run(
            &task.recurrence,
            Utc::now(),
            self.cron.as_ref(),
        )?);
        self.tasks.put(task.clone()).await?;
        info!(task_id = %task.id, "scheduled task stored");
        Ok(task)
    }

    /// Apply a partial update; a rule change recomputes `nextRun`.
    pub async fn update_scheduled_task(
        &self,
        id: Uuid,
        updates: ScheduledTaskUpdate,
    ) -> Result<ScheduledTask, ServiceError> {
        let mut task = self
            .tasks
            .get(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))?;

        if let Some(name) = updates.name {
            task.name = name;
        }
        if let Some(action) = updates.action {
            task.action = action;
        }
        if let Some(active) = updates.is_active {
            task.is_active = active;
        }
        if let Some(recurrence) = updates.recurrence {
            task.recurrence = recurrence;
            task.next_run = Some(calculator::next_run(
                &task.recurrence,
                Utc::now(),
                self.cron.as_ref(),
            )?);
        }

        self.tasks.put(task.clone()).await?;
        Ok(task)
    }

    pub async fn get_scheduled_task(&self, id: Uuid) -> Result<ScheduledTask, ServiceError> {
        self.tasks.get(id).await?.ok_or(ServiceError::TaskNotFound(id))
    }

    pub async fn delete_scheduled_task(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.tasks.delete(id).await?)
    }

    /// Fire a due scheduled task. See [`ScheduledTaskRunner::fire`].
    pub async fn fire(&self, task_id: Uuid) -> bool {
        self.runner.fire(task_id).await
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use actions::mock::{RecordingIntegrationSync, RecordingNotifier, RecordingTaskService};
    use actions::CreateTaskConfig;
    use engine::{EngineError, RunStatus, Step, StepConfig};
    use schedule::CronExpressionEvaluator;
    use store::{MemoryTaskStore, MemoryWorkflowStore};

    struct Fixture {
        service: AutomationService,
        tasks: Arc<RecordingTaskService>,
        task_store: Arc<MemoryTaskStore>,
    }

    fn fixture() -> Fixture {
        let tasks = Arc::new(RecordingTaskService::new());
        let task_store = Arc::new(MemoryTaskStore::new());
        let dispatcher = Arc::new(ActionDispatcher::new(
            tasks.clone(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingIntegrationSync::new()),
        ));
        let service = AutomationService::new(
            Arc::new(MemoryWorkflowStore::new()),
            task_store.clone(),
            dispatcher,
            Arc::new(CronExpressionEvaluator),
        );
        Fixture { service, tasks, task_store }
    }

    fn trigger(id: &str, next: &[&str]) -> Step {
        Step {
            id: id.to_owned(),
            config: StepConfig::Trigger,
            next_steps: next.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn create_task_step(id: &str, title: &str, next: &[&str]) -> Step {
        let mut task_data = Map::new();
        task_data.insert("title".to_owned(), json!(title));
        Step {
            id: id.to_owned(),
            config: StepConfig::Action(ActionConfig::CreateTask(CreateTaskConfig {
                task_data,
                project_id: None,
            })),
            next_steps: next.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().expect("fixture must be an object").clone()
    }

    #[tokio::test]
    async fn create_then_execute_round_trip() {
        let fx = fixture();
        let wf = WorkflowDefinition::new(
            "triage",
            vec![trigger("start", &["mk"]), create_task_step("mk", "Review", &[])],
            "start",
        );

        let stored = fx.service.create_workflow(wf).await.expect("valid workflow");
        let record = fx
            .service
            .execute(stored.id, bag(json!({ "projectId": "p-1" })))
            .await
            .expect("execution starts");

        assert_eq!(record.status, RunStatus::Completed);
        assert_eq!(record.data["taskId"], json!("task-1"));
        assert_eq!(record.data["task"]["projectId"], json!("p-1"));
        assert_eq!(fx.tasks.call_count(), 1);
    }

    #[tokio::test]
    async fn structurally_broken_workflows_are_rejected_on_create() {
        let fx = fixture();
        let wf = WorkflowDefinition::new(
            "cyclic",
            vec![
                trigger("start", &["a"]),
                create_task_step("a", "x", &["b"]),
                create_task_step("b", "y", &["a"]),
            ],
            "start",
        );

        let err = fx.service.create_workflow(wf).await.expect_err("must reject");
        assert!(matches!(
            err,
            ServiceError::Invalid(EngineError::CycleDetected { .. })
        ));
    }

    #[tokio::test]
    async fn executing_an_unknown_workflow_is_refused() {
        let fx = fixture();
        let err = fx
            .service
            .execute(Uuid::new_v4(), Map::new())
            .await
            .expect_err("must refuse");
        assert!(matches!(err, ServiceError::WorkflowNotFound(_)));
    }

    #[tokio::test]
    async fn executing_a_deactivated_workflow_is_refused() {
        let fx = fixture();
        let mut wf = WorkflowDefinition::new("paused", vec![trigger("start", &[])], "start");
        wf.is_active = false;
        let stored = fx.service.create_workflow(wf).await.expect("valid workflow");

        let err = fx
            .service
            .execute(stored.id, Map::new())
            .await
            .expect_err("must refuse");
        assert!(matches!(err, ServiceError::WorkflowInactive(_)));
        assert_eq!(fx.tasks.call_count(), 0);
    }

    #[tokio::test]
    async fn update_revalidates_the_new_definition() {
        let fx = fixture();
        let wf = WorkflowDefinition::new("ok", vec![trigger("start", &[])], "start");
        let stored = fx.service.create_workflow(wf).await.expect("valid workflow");

        let broken = WorkflowDefinition::new(
            "now broken",
            vec![trigger("start", &["ghost"])],
            "start",
        );
        let err = fx
            .service
            .update_workflow(stored.id, broken)
            .await
            .expect_err("must reject");
        assert!(matches!(
            err,
            ServiceError::Invalid(EngineError::DanglingReference { .. })
        ));

        // The stored version is still the valid one.
        let kept = fx.service.get_workflow(stored.id).await.expect("still stored");
        assert_eq!(kept.name, "ok");
    }

    fn sample_task(recurrence: Recurrence) -> ScheduledTask {
        let mut task_data = Map::new();
        task_data.insert("title".to_owned(), json!("Standup"));
        ScheduledTask::new(
            "reminder",
            recurrence,
            ActionConfig::CreateTask(CreateTaskConfig { task_data, project_id: None }),
        )
    }

    #[tokio::test]
    async fn creating_a_task_computes_its_first_next_run() {
        let fx = fixture();
        let task = sample_task(Recurrence::Daily { time: "09:00".to_owned() });

        let stored = fx
            .service
            .create_scheduled_task(task)
            .await
            .expect("valid rule");

        assert!(stored.next_run.is_some_and(|t| t > Utc::now()));
        assert!(stored.last_run.is_none());
    }

    #[tokio::test]
    async fn creating_a_task_with_a_broken_rule_is_refused() {
        let fx = fixture();
        let task = sample_task(Recurrence::Daily { time: "noon".to_owned() });

        let err = fx
            .service
            .create_scheduled_task(task)
            .await
            .expect_err("must refuse");
        assert!(matches!(err, ServiceError::Schedule(_)));
    }

    #[tokio::test]
    async fn updating_the_rule_recomputes_next_run() {
        let fx = fixture();
        let stored = fx
            .service
            .create_scheduled_task(sample_task(Recurrence::Daily { time: "09:00".to_owned() }))
            .await
            .expect("valid rule");
        let original_next = stored.next_run;

        let updated = fx
            .service
            .update_scheduled_task(
                stored.id,
                ScheduledTaskUpdate {
                    recurrence: Some(Recurrence::Weekly {
                        days: vec![1],
                        time: Some("06:00".to_owned()),
                    }),
                    ..ScheduledTaskUpdate::default()
                },
            )
            .await
            .expect("update applies");

        assert_ne!(updated.next_run, original_next);
        assert!(updated.next_run.is_some_and(|t| t > Utc::now()));
    }

    #[tokio::test]
    async fn deactivation_pauses_without_recomputing() {
        let fx = fixture();
        let stored = fx
            .service
            .create_scheduled_task(sample_task(Recurrence::Daily { time: "09:00".to_owned() }))
            .await
            .expect("valid rule");

        let updated = fx
            .service
            .update_scheduled_task(
                stored.id,
                ScheduledTaskUpdate { is_active: Some(false), ..ScheduledTaskUpdate::default() },
            )
            .await
            .expect("update applies");

        assert!(!updated.is_active);
        assert_eq!(updated.next_run, stored.next_run);
        // A paused task does not fire.
        assert!(!fx.service.fire(stored.id).await);
    }

    #[tokio::test]
    async fn fire_round_trip_advances_the_task() {
        let fx = fixture();
        let stored = fx
            .service
            .create_scheduled_task(sample_task(Recurrence::Daily { time: "09:00".to_owned() }))
            .await
            .expect("valid rule");

        assert!(fx.service.fire(stored.id).await);

        let after = fx
            .service
            .get_scheduled_task(stored.id)
            .await
            .expect("still stored");
        assert!(after.last_run.is_some());
        assert!(after.next_run.is_some_and(|t| t > Utc::now()));
        assert_eq!(fx.tasks.call_count(), 1);

        // Direct store access agrees with the façade.
        let raw = fx.task_store.get(stored.id).await.unwrap().expect("stored");
        assert_eq!(raw.last_run, after.last_run);
    }

    #[tokio::test]
    async fn firing_an_unknown_task_returns_false() {
        let fx = fixture();
        assert!(!fx.service.fire(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn updating_an_unknown_task_is_refused() {
        let fx = fixture();
        let err = fx
            .service
            .update_scheduled_task(Uuid::new_v4(), ScheduledTaskUpdate::default())
            .await
            .expect_err("must refuse");
        assert!(matches!(err, ServiceError::TaskNotFound(_)));
    }
}
