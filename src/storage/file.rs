//! Single-file JSON workflow store

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::{StorageError, StorageResult};
use super::traits::WorkflowStore;
use crate::config::workflow::Workflow;

/// Every workflow lives in one pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole collection; a missing file is an empty one
    async fn read_all(&self) -> StorageResult<Vec<Workflow>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Store file {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::serialization(&self.path, e))
    }

    /// Replace the collection on disk
    async fn write_all(&self, workflows: &[Workflow]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(workflows)
            .map_err(|e| StorageError::serialization(&self.path, e))?;
        fs::write(&self.path, content).await?;
        tracing::debug!(
            "Wrote {} workflows to {}",
            workflows.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl WorkflowStore for JsonFileStore {
    async fn list(&self) -> StorageResult<Vec<Workflow>> {
        self.read_all().await
    }

    async fn load(&self, id: &str) -> StorageResult<Workflow> {
        self.read_all()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| StorageError::not_found(id))
    }

    async fn save(&self, mut workflow: Workflow) -> StorageResult<String> {
        workflow.ensure_id();
        let id = workflow.id.clone();
        let mut workflows = self.read_all().await?;

        match workflows.iter_mut().find(|w| w.id == id) {
            Some(existing) => {
                tracing::debug!("Replacing workflow {}", id);
                *existing = workflow;
            }
            None => {
                tracing::debug!("Adding workflow {}", id);
                workflows.push(workflow);
            }
        }

        self.write_all(&workflows).await?;
        Ok(id)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let mut workflows = self.read_all().await?;
        let before = workflows.len();
        workflows.retain(|w| w.id != id);

        if workflows.len() == before {
            return Err(StorageError::not_found(id));
        }
        self.write_all(&workflows).await
    }

    async fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.read_all().await?.iter().any(|w| w.id == id))
    }
}
