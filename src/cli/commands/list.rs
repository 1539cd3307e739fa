//! List command implementation

use anyhow::Result;

use crate::config::workflow::Workflow;
use crate::error::CmdrError;
use crate::storage::WorkflowStore;

/// Print every stored workflow
pub async fn run_list_command(store: &dyn WorkflowStore) -> Result<()> {
    let workflows = store.list().await.map_err(CmdrError::from)?;
    print!("{}", render_list(&workflows));
    Ok(())
}

/// One line per workflow, followed by its description when present
pub fn render_list(workflows: &[Workflow]) -> String {
    if workflows.is_empty() {
        return "No workflows stored. Add one with `cmdr import <FILE>`.\n".to_string();
    }

    let id_width = workflows.iter().map(|w| w.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for workflow in workflows {
        let steps = match workflow.steps.len() {
            1 => "1 step".to_string(),
            n => format!("{n} steps"),
        };
        out.push_str(&format!(
            "{:<width$}  {} ({})\n",
            workflow.id,
            workflow.name,
            steps,
            width = id_width
        ));
        if let Some(description) = workflow.description.as_deref() {
            let indent = " ".repeat(id_width);
            out.push_str(&format!("{indent}  {description}\n"));
        }
    }
    out
}
