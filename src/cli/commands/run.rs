//! Run command implementation
//!
//! Picks a stored workflow (by id or from a menu) and executes it.

use anyhow::Result;
use std::sync::Arc;

use crate::config::workflow::Workflow;
use crate::error::{CmdrError, ErrorCode};
use crate::interaction::{DefaultUserInteraction, PromptOutcome, UserInteraction};
use crate::storage::WorkflowStore;
use crate::subprocess::{ProcessRunner, SubprocessManager};
use crate::workflow::{RunSummary, WorkflowExecutor};

/// Execute the `run` command against the terminal and the host shell
pub async fn run_workflow_command(store: &dyn WorkflowStore, id: Option<String>) -> Result<()> {
    let interaction: Arc<dyn UserInteraction> = Arc::new(DefaultUserInteraction::new());
    let runner = SubprocessManager::production().runner();
    run_workflow(store, id.as_deref(), interaction, runner).await?;
    Ok(())
}

/// Resolve the workflow to run and execute it
pub async fn run_workflow(
    store: &dyn WorkflowStore,
    id: Option<&str>,
    interaction: Arc<dyn UserInteraction>,
    runner: Arc<dyn ProcessRunner>,
) -> Result<RunSummary> {
    let workflow = match id {
        Some(id) => store.load(id).await.map_err(CmdrError::from)?,
        None => select_workflow(store, interaction.as_ref()).await?,
    };

    if let Some(description) = workflow.description.as_deref() {
        interaction.display_info(description);
    }

    let mut executor = WorkflowExecutor::new(Arc::clone(&interaction), runner);
    match executor.execute(&workflow).await {
        Ok(summary) => {
            let message = match summary.warnings.len() {
                0 => format!("Workflow '{}' completed", workflow.name),
                1 => format!("Workflow '{}' completed with 1 warning", workflow.name),
                n => format!("Workflow '{}' completed with {} warnings", workflow.name, n),
            };
            interaction.display_success(&message);
            Ok(summary)
        }
        Err(e) => Err(CmdrError::from(e).with_workflow(&workflow.name).into()),
    }
}

/// Let the user pick one of the stored workflows
async fn select_workflow(
    store: &dyn WorkflowStore,
    interaction: &dyn UserInteraction,
) -> Result<Workflow> {
    let mut workflows = store.list().await.map_err(CmdrError::from)?;
    if workflows.is_empty() {
        return Err(CmdrError::workflow_with_code(
            ErrorCode::WORKFLOW_EMPTY_STORE,
            "no workflows stored; add one with `cmdr import <FILE>`",
        )
        .into());
    }

    let labels: Vec<String> = workflows.iter().map(menu_label).collect();
    match interaction.prompt_choice("Select a workflow", &labels).await? {
        PromptOutcome::Answered(index) if index < workflows.len() => {
            Ok(workflows.swap_remove(index))
        }
        PromptOutcome::Answered(index) => Err(anyhow::anyhow!(
            "selection {} out of range for {} workflows",
            index,
            workflows.len()
        )),
        PromptOutcome::Cancelled => Err(CmdrError::cancelled("workflow selection").into()),
    }
}

fn menu_label(workflow: &Workflow) -> String {
    match workflow.description.as_deref() {
        Some(description) if !description.is_empty() => {
            format!("{} - {}", workflow.name, description)
        }
        _ => workflow.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workflow::{CommandStep, Step};
    use crate::interaction::mocks::MockUserInteraction;
    use crate::storage::JsonFileStore;
    use crate::subprocess::MockProcessRunner;
    use tempfile::TempDir;

    async fn seeded_store(dir: &TempDir) -> JsonFileStore {
        let store = JsonFileStore::new(dir.path().join("workflows.json"));
        store
            .save(
                Workflow::new("Build")
                    .with_description("compile everything")
                    .with_step(Step::command(CommandStep::new("make"))),
            )
            .await
            .unwrap();
        store
            .save(
                Workflow::new("Greet")
                    .with_step(Step::input("Name?", "name"))
                    .with_step(Step::command(CommandStep::new("echo hi {{name}}"))),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_run_by_id() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let interaction = Arc::new(MockUserInteraction::new());
        interaction.add_text_response("Ada");
        let mut runner = MockProcessRunner::new();
        runner.expect_shell("echo hi Ada").finish();

        let summary = run_workflow(
            &store,
            Some("greet"),
            interaction.clone(),
            Arc::new(runner.clone()),
        )
        .await
        .unwrap();

        assert_eq!(summary.steps_run, 2);
        assert!(interaction
            .get_messages()
            .contains(&"SUCCESS: Workflow 'Greet' completed".to_string()));
    }

    #[tokio::test]
    async fn test_run_from_menu() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let interaction = Arc::new(MockUserInteraction::new());
        interaction.add_choice_response(0);
        let mut runner = MockProcessRunner::new();
        runner.expect_shell("make").finish();

        run_workflow(&store, None, interaction.clone(), Arc::new(runner.clone()))
            .await
            .unwrap();

        let messages = interaction.get_messages();
        assert_eq!(
            messages[0],
            "CHOICE: Select a workflow [Build - compile everything, Greet]"
        );
        assert_eq!(messages[1], "INFO: compile everything");
        assert_eq!(runner.shell_scripts(), vec!["make"]);
    }

    #[tokio::test]
    async fn test_menu_cancel_is_cancellation() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        let interaction = Arc::new(MockUserInteraction::new());
        interaction.add_choice_cancel();

        let runner = Arc::new(MockProcessRunner::new());
        let err = run_workflow(&store, None, interaction, runner)
            .await
            .unwrap_err();

        let cmdr_err = err.downcast_ref::<CmdrError>().unwrap();
        assert!(cmdr_err.is_cancellation());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("workflows.json"));

        let err = run_workflow(
            &store,
            None,
            Arc::new(MockUserInteraction::new()),
            Arc::new(MockProcessRunner::new()),
        )
        .await
        .unwrap_err();

        let cmdr_err = err.downcast_ref::<CmdrError>().unwrap();
        assert_eq!(cmdr_err.code(), ErrorCode::WORKFLOW_EMPTY_STORE);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let err = run_workflow(
            &store,
            Some("ghost"),
            Arc::new(MockUserInteraction::new()),
            Arc::new(MockProcessRunner::new()),
        )
        .await
        .unwrap_err();

        let cmdr_err = err.downcast_ref::<CmdrError>().unwrap();
        assert_eq!(cmdr_err.code(), ErrorCode::STORAGE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_run_names_workflow() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("workflows.json"));
        store
            .save(Workflow::new("Strict").with_step(Step::command(
                CommandStep::new("false").die_on_error(true),
            )))
            .await
            .unwrap();
        let mut runner = MockProcessRunner::new();
        runner.expect_shell("false").returns_exit_code(1).finish();

        let err = run_workflow(
            &store,
            Some("strict"),
            Arc::new(MockUserInteraction::new()),
            Arc::new(runner),
        )
        .await
        .unwrap_err();

        let cmdr_err = err.downcast_ref::<CmdrError>().unwrap();
        assert_eq!(cmdr_err.exit_code(), 1);
        assert!(cmdr_err
            .user_message()
            .starts_with("Workflow 'Strict' failed at step 1"));
    }
}
