//! Typed configuration for every supported action kind.
//!
//! The action set is a closed sum type tagged by `type` on the wire.  An
//! unrecognized tag — or a sync action without its `integrationId` — fails
//! when the definition is decoded, before anything runs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One action a workflow step (or a scheduled task) can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionConfig {
    /// Create a task through the task-creation collaborator.
    #[serde(rename = "task.create")]
    CreateTask(CreateTaskConfig),

    /// Deliver an in-app notification.
    #[serde(rename = "notification.send")]
    SendNotification(MessageConfig),

    /// Deliver an email.
    #[serde(rename = "email.send")]
    SendEmail(MessageConfig),

    /// Kick off a third-party data sync.
    #[serde(rename = "integration.sync")]
    SyncIntegration(SyncConfig),

    /// Run a user-supplied script against the run's data bag.
    #[serde(rename = "custom.script")]
    RunScript(ScriptConfig),
}

impl ActionConfig {
    /// Wire name of the action kind, used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateTask(_) => "task.create",
            Self::SendNotification(_) => "notification.send",
            Self::SendEmail(_) => "email.send",
            Self::SyncIntegration(_) => "integration.sync",
            Self::RunScript(_) => "custom.script",
        }
    }
}

/// Configuration for `task.create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskConfig {
    /// Field values layered over the payload defaults.
    #[serde(default)]
    pub task_data: Map<String, Value>,
    /// Explicit project assignment; when absent, `projectId` is taken from
    /// the run's data bag.
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Configuration for `notification.send` and `email.send`.
///
/// All three fields are `{{field}}` templates rendered against the data bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

/// Configuration for `integration.sync`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub integration_id: String,
}

/// Configuration for `custom.script`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Script body, evaluated with the data bag bound to the `data` global.
    pub script: String,
}
