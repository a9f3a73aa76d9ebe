//! `actions` crate — the closed action set, its dispatcher, and the
//! collaborator traits actions call out to.
//!
//! Every side effect a workflow can perform goes through [`ActionDispatcher`].
//! The dispatcher itself stays pure routing: real work happens in the
//! collaborators behind [`TaskService`], [`Notifier`], and [`IntegrationSync`].

pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod mock;
pub mod script;
pub mod traits;

pub use config::{ActionConfig, CreateTaskConfig, MessageConfig, ScriptConfig, SyncConfig};
pub use dispatch::ActionDispatcher;
pub use error::ActionError;
pub use traits::{IntegrationSync, Notifier, OutboundMessage, SyncReport, TaskService};
