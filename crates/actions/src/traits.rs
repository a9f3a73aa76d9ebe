//! Collaborator contracts — the external services actions call out to.
//!
//! The automation core depends on these capabilities only through the traits
//! below; nothing here assumes a concrete transport or storage engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rendered notification or email, ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Outcome reported by an integration sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub success: bool,
    pub message: String,
    pub synced_items: u64,
}

/// Task-creation collaborator: accepts a task payload, returns the new
/// task's id.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, payload: &Map<String, Value>) -> anyhow::Result<String>;
}

/// Notification/email delivery collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the message. `Ok(false)` means the collaborator declined
    /// without erroring (recipient opted out, channel muted).
    async fn deliver(&self, message: &OutboundMessage) -> anyhow::Result<bool>;
}

/// Third-party data-sync collaborator.
#[async_trait]
pub trait IntegrationSync: Send + Sync {
    async fn sync(&self, integration_id: &str) -> anyhow::Result<SyncReport>;
}
