//! Import command implementation
//!
//! Loads definitions from a file, validates them and adds them to the store.

use anyhow::Result;
use std::path::Path;

use super::validate::check_workflows;
use crate::config::loader::load_definitions;
use crate::error::{CmdrError, ErrorCode};
use crate::storage::WorkflowStore;

/// Execute the `import` command
pub async fn run_import_command(store: &dyn WorkflowStore, file: &Path, force: bool) -> Result<()> {
    for id in import_workflows(store, file, force).await? {
        println!("✅ Imported '{id}'");
    }
    Ok(())
}

/// Store every workflow in `file`, returning their ids
///
/// Nothing is written unless the whole file is valid and, without `force`,
/// none of its ids already exist.
pub async fn import_workflows(
    store: &dyn WorkflowStore,
    file: &Path,
    force: bool,
) -> Result<Vec<String>, CmdrError> {
    let workflows = load_definitions(file).await?;
    check_workflows(file, &workflows)?;

    if !force {
        for workflow in &workflows {
            if store.exists(&workflow.id).await? {
                return Err(CmdrError::storage_with_code(
                    ErrorCode::STORAGE_ALREADY_EXISTS,
                    format!(
                        "workflow '{}' already exists; use --force to replace it",
                        workflow.id
                    ),
                ));
            }
        }
    }

    let mut ids = Vec::with_capacity(workflows.len());
    for workflow in workflows {
        ids.push(store.save(workflow).await?);
    }
    tracing::info!("Imported {} workflows from {}", ids.len(), file.display());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileStore;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_list_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let file = write(
            &dir,
            "defs.yaml",
            "- name: One\n  steps: []\n- name: Two\n  steps:\n    - type: confirm\n      prompt: ok?\n      variable: ok\n",
        );

        let ids = import_workflows(&store, &file, false).await.unwrap();

        assert_eq!(ids, vec!["one", "two"]);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_existing_id_requires_force() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let file = write(&dir, "one.yaml", "name: One\ndescription: v1\nsteps: []\n");
        import_workflows(&store, &file, false).await.unwrap();

        let err = import_workflows(&store, &file, false).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::STORAGE_ALREADY_EXISTS);

        write(&dir, "one.yaml", "name: One\ndescription: v2\nsteps: []\n");
        import_workflows(&store, &file, true).await.unwrap();
        let stored = store.load("one").await.unwrap();
        assert_eq!(stored.description.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_invalid_file_stores_nothing() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        let file = write(
            &dir,
            "bad.yaml",
            "- name: Good\n  steps: []\n- name: Bad\n  steps:\n    - type: command\n      command: ''\n",
        );

        let err = import_workflows(&store, &file, false).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(store.list().await.unwrap().is_empty());
    }
}
