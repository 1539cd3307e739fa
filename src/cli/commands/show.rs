//! Show command implementation

use anyhow::Result;

use crate::error::CmdrError;
use crate::storage::WorkflowStore;

/// Print a stored workflow as YAML
pub async fn run_show_command(store: &dyn WorkflowStore, id: &str) -> Result<()> {
    let workflow = store.load(id).await.map_err(CmdrError::from)?;
    print!("{}", serde_yaml::to_string(&workflow)?);
    Ok(())
}
