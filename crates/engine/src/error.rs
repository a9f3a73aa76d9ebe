//! Engine-level error types.

use thiserror::Error;

/// Structural problems found by workflow validation.
///
/// These are always rejected before a run starts and are never retried;
/// run-time failures live on the `ExecutionRecord` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Two or more steps share the same ID.
    #[error("duplicate step ID: '{0}'")]
    DuplicateStepId(String),

    /// `triggerStep` does not name any step in the workflow.
    #[error("trigger step '{0}' does not exist in the workflow")]
    MissingTrigger(String),

    /// `triggerStep` names a step that is not of kind trigger.
    #[error("trigger step '{0}' is not of kind trigger")]
    WrongTriggerKind(String),

    /// A `nextSteps` entry references a step ID that doesn't exist.
    #[error("step '{step_id}' references unknown step '{target}'")]
    DanglingReference { step_id: String, target: String },

    /// The walk from the trigger found a back-edge.
    #[error("cycle detected on edge '{from}' -> '{to}'")]
    CycleDetected { from: String, to: String },
}
