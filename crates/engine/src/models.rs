//! Core domain models for the automation engine.
//!
//! These types are the source of truth for what a workflow looks like
//! in memory.  They serialise to/from the JSON definition documents the
//! persistence collaborator stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use actions::ActionConfig;

use crate::condition::ConditionConfig;

// ---------------------------------------------------------------------------
// StepConfig
// ---------------------------------------------------------------------------

/// Kind-specific configuration of a step, tagged by `kind` on the wire.
///
/// The set is closed: an unrecognized kind fails when the definition is
/// decoded, never at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepConfig {
    /// The workflow's entry point. Carries no configuration.
    Trigger,
    /// Picks exactly one successor: `nextSteps[0]` on true, `nextSteps[1]`
    /// on false.
    Condition(ConditionConfig),
    /// Performs a side effect and fans out to all successors.
    Action(ActionConfig),
}

impl StepConfig {
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Trigger)
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// A single node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique identifier within this workflow (referenced by `nextSteps`).
    pub id: String,
    #[serde(flatten)]
    pub config: StepConfig,
    /// Successor step ids. Ordered: condition steps read index 0 as the true
    /// branch and index 1 as the false branch.
    #[serde(default)]
    pub next_steps: Vec<String>,
}

// ---------------------------------------------------------------------------
// WorkflowDefinition
// ---------------------------------------------------------------------------

/// A complete workflow definition.
///
/// Immutable once a run has started — a new version is a new object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: Uuid,
    pub name: String,
    pub steps: Vec<Step>,
    /// Id of the step execution starts from; must be of kind trigger.
    pub trigger_step: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    /// Convenience constructor; new definitions start active.
    pub fn new(name: impl Into<String>, steps: Vec<Step>, trigger_step: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            steps,
            trigger_step: trigger_step.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }
}

// ---------------------------------------------------------------------------
// ExecutionRecord
// ---------------------------------------------------------------------------

/// In-flight and terminal statuses of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The record of one workflow run: its progress, data bag, and outcome.
///
/// Owned by exactly one run. Concurrent runs of the same workflow each get
/// their own record and share no mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub status: RunStatus,
    /// Last step entered by the walk.
    pub current_step: Option<String>,
    /// Merged, never replaced: each action's output lands on top of what is
    /// already here, last writer wins.
    pub data: Map<String, Value>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    /// Open a fresh record for one run of `workflow_id`.
    pub fn begin(workflow_id: Uuid, initial_data: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id,
            status: RunStatus::Running,
            current_step: None,
            data: initial_data,
            error: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Mark the run failed with `message`. The walk stops after this.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = RunStatus::Failed;
        self.error = Some(message.into());
    }

    /// Stamp `completedAt`; a still-running record becomes completed.
    pub fn finish(&mut self) {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Completed;
        }
        self.completed_at = Some(Utc::now());
    }
}
