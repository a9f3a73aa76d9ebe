//! Action dispatch — exhaustive routing over the closed action set.
//!
//! `dispatch` returns the key/value pairs to merge back into the run's data
//! bag. Side effects belong to the collaborators; the dispatcher only builds
//! payloads, calls out, and shapes the output record.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::{ActionConfig, CreateTaskConfig, MessageConfig, SyncConfig};
use crate::data::render_template;
use crate::error::ActionError;
use crate::script;
use crate::traits::{IntegrationSync, Notifier, OutboundMessage, TaskService};

/// Routes each action kind to its collaborator.
pub struct ActionDispatcher {
    tasks: Arc<dyn TaskService>,
    notifier: Arc<dyn Notifier>,
    integrations: Arc<dyn IntegrationSync>,
}

impl ActionDispatcher {
    pub fn new(
        tasks: Arc<dyn TaskService>,
        notifier: Arc<dyn Notifier>,
        integrations: Arc<dyn IntegrationSync>,
    ) -> Self {
        Self { tasks, notifier, integrations }
    }

    /// Perform the action and return the pairs to merge into the data bag.
    ///
    /// Any collaborator or script failure comes back as
    /// [`ActionError::ExecutionFailed`] naming the action kind.
    pub async fn dispatch(
        &self,
        action: &ActionConfig,
        data: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ActionError> {
        debug!(action = action.kind(), "dispatching action");

        match action {
            ActionConfig::CreateTask(cfg) => self.create_task(cfg, data).await,
            ActionConfig::SendNotification(cfg) => {
                self.send_message(cfg, data, "notification.send", "notification").await
            }
            ActionConfig::SendEmail(cfg) => {
                self.send_message(cfg, data, "email.send", "email").await
            }
            ActionConfig::SyncIntegration(cfg) => self.sync_integration(cfg).await,
            ActionConfig::RunScript(cfg) => {
                script::run(cfg, data).map_err(|e| ActionError::wrap("custom.script", e))
            }
        }
    }

    async fn create_task(
        &self,
        cfg: &CreateTaskConfig,
        data: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ActionError> {
        // Payload defaults sit under the configured values.
        let mut payload = Map::new();
        payload.insert("priority".to_owned(), json!("normal"));
        payload.insert("status".to_owned(), json!("pending"));
        for (key, value) in &cfg.task_data {
            payload.insert(key.clone(), value.clone());
        }

        if !payload.contains_key("projectId") {
            let project = cfg
                .project_id
                .clone()
                .map(Value::String)
                .or_else(|| data.get("projectId").cloned())
                .unwrap_or(Value::Null);
            payload.insert("projectId".to_owned(), project);
        }

        let task_id = self
            .tasks
            .create_task(&payload)
            .await
            .map_err(|e| ActionError::wrap("task.create", e))?;

        let mut out = Map::new();
        out.insert("taskId".to_owned(), json!(task_id));
        out.insert("task".to_owned(), Value::Object(payload));
        Ok(out)
    }

    async fn send_message(
        &self,
        cfg: &MessageConfig,
        data: &Map<String, Value>,
        action: &'static str,
        output_key: &'static str,
    ) -> Result<Map<String, Value>, ActionError> {
        let message = OutboundMessage {
            recipient: render_template(&cfg.recipient, data),
            subject: render_template(&cfg.subject, data),
            body: render_template(&cfg.body, data),
        };

        let sent = self
            .notifier
            .deliver(&message)
            .await
            .map_err(|e| ActionError::wrap(action, e))?;

        let mut out = Map::new();
        out.insert("sent".to_owned(), json!(sent));
        out.insert(
            output_key.to_owned(),
            json!({
                "recipient": message.recipient,
                "subject": message.subject,
                "body": message.body,
            }),
        );
        Ok(out)
    }

    async fn sync_integration(&self, cfg: &SyncConfig) -> Result<Map<String, Value>, ActionError> {
        let report = self
            .integrations
            .sync(&cfg.integration_id)
            .await
            .map_err(|e| ActionError::wrap("integration.sync", e))?;

        let mut out = Map::new();
        out.insert("success".to_owned(), json!(report.success));
        out.insert("message".to_owned(), json!(report.message));
        out.insert("syncedItems".to_owned(), json!(report.synced_items));
        Ok(out)
    }
}
