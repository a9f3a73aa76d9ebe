//! Workflow persistence capability.

use async_trait::async_trait;
use uuid::Uuid;

use engine::WorkflowDefinition;

/// Keyed access to persisted workflow definitions.
///
/// The service layer validates before every `put`; implementations only
/// store and retrieve.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<WorkflowDefinition>>;
    async fn put(&self, workflow: WorkflowDefinition) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn list(&self) -> anyhow::Result<Vec<WorkflowDefinition>>;
}
