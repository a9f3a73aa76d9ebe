//! `engine` crate — core domain models, graph validation, and the workflow
//! executor.

pub mod condition;
pub mod error;
pub mod executor;
pub mod models;
pub mod validate;

pub use condition::{ConditionConfig, Operator};
pub use error::EngineError;
pub use executor::WorkflowExecutor;
pub use models::{ExecutionRecord, RunStatus, Step, StepConfig, WorkflowDefinition};
pub use validate::validate_workflow;
