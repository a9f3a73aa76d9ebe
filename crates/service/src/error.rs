//! Service-level error type.

use thiserror::Error;
use uuid::Uuid;

use engine::EngineError;
use schedule::ScheduleError;

/// Failures surfaced by the service entry points.
///
/// Structural rejections come through verbatim; run-time workflow failures
/// never appear here — they live on the returned `ExecutionRecord`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("workflow {0} not found")]
    WorkflowNotFound(Uuid),

    #[error("workflow {0} is deactivated")]
    WorkflowInactive(Uuid),

    #[error("scheduled task {0} not found")]
    TaskNotFound(Uuid),

    /// The definition failed structural validation.
    #[error(transparent)]
    Invalid(#[from] EngineError),

    /// The recurrence rule could not be computed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
