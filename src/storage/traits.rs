//! Storage seam for workflow definitions

use async_trait::async_trait;

use super::error::StorageResult;
use crate::config::workflow::Workflow;

/// Persistent collection of workflows keyed by id
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// All workflows in stored order
    async fn list(&self) -> StorageResult<Vec<Workflow>>;

    /// Load a workflow by id, failing with `NotFound` when absent
    async fn load(&self, id: &str) -> StorageResult<Workflow>;

    /// Insert or replace a workflow, returning the id it was stored under
    async fn save(&self, workflow: Workflow) -> StorageResult<String>;

    /// Remove a workflow, failing with `NotFound` when absent
    async fn delete(&self, id: &str) -> StorageResult<()>;

    async fn exists(&self, id: &str) -> StorageResult<bool>;
}
