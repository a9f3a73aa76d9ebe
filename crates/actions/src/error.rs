//! Action-level error type.

use thiserror::Error;

/// Errors surfaced by the dispatcher.
///
/// Every underlying collaborator or script failure is wrapped as
/// `ExecutionFailed`, so the executor only ever sees a single failure shape.
/// The cause is preserved for diagnostics.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action '{action}' failed: {source}")]
    ExecutionFailed {
        /// Wire name of the failing action kind.
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ActionError {
    pub(crate) fn wrap(action: &'static str, source: anyhow::Error) -> Self {
        Self::ExecutionFailed { action, source }
    }
}
