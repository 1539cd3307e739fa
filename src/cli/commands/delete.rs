//! Delete command implementation

use anyhow::Result;

use crate::error::CmdrError;
use crate::interaction::{DefaultUserInteraction, PromptOutcome, UserInteraction};
use crate::storage::WorkflowStore;

/// Execute the `delete` command
pub async fn run_delete_command(store: &dyn WorkflowStore, id: &str, yes: bool) -> Result<()> {
    let interaction = DefaultUserInteraction::new();
    delete_workflow(store, &interaction, id, yes).await?;
    Ok(())
}

/// Delete `id` after confirming with the user, returning whether it was removed
pub async fn delete_workflow(
    store: &dyn WorkflowStore,
    interaction: &dyn UserInteraction,
    id: &str,
    yes: bool,
) -> Result<bool> {
    // Fail on unknown ids before asking anything
    let workflow = store.load(id).await.map_err(CmdrError::from)?;

    if !yes {
        let question = format!("Delete workflow '{}' ({})?", workflow.id, workflow.name);
        match interaction.prompt_yes_no(&question).await? {
            PromptOutcome::Answered(true) => {}
            PromptOutcome::Answered(false) => {
                interaction.display_info("Nothing deleted");
                return Ok(false);
            }
            PromptOutcome::Cancelled => return Err(CmdrError::cancelled("delete").into()),
        }
    }

    store.delete(id).await.map_err(CmdrError::from)?;
    interaction.display_success(&format!("Deleted '{id}'"));
    Ok(true)
}
