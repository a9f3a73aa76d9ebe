//! `store` crate — persistence capability interfaces and the in-process
//! implementation used by tests and the CLI.
//!
//! The automation core reads and writes definitions only through these
//! traits; no storage engine details leak in, and no business logic lives
//! here. The scheduled-task counterpart, [`schedule::TaskStore`], is defined
//! next to its consumer in the schedule crate.

pub mod memory;
pub mod workflows;

pub use memory::{MemoryTaskStore, MemoryWorkflowStore};
pub use workflows::WorkflowStore;
