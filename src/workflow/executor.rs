use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::condition;
use super::error::RunError;
use super::steps::{self, StepContext, StepOutcome};
use super::variables::VariableStore;
use crate::config::workflow::{Step, StepKind, Workflow};
use crate::interaction::UserInteraction;
use crate::subprocess::ProcessRunner;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// A command failure that was tolerated because its step does not die on error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWarning {
    /// 1-based
    pub step: usize,
    pub message: String,
}

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps_total: usize,
    pub steps_run: usize,
    pub steps_skipped: usize,
    pub warnings: Vec<RunWarning>,
    /// Final variable values
    pub variables: HashMap<String, String>,
}

/// Runs a workflow's steps in order against one variable store
///
/// The store only holds values while `execute` is running; it is empty
/// before and after every run.
pub struct WorkflowExecutor {
    interaction: Arc<dyn UserInteraction>,
    runner: Arc<dyn ProcessRunner>,
    variables: VariableStore,
    state: RunState,
}

impl WorkflowExecutor {
    pub fn new(interaction: Arc<dyn UserInteraction>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            interaction,
            runner,
            variables: VariableStore::new(),
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run every step of `workflow`, stopping at the first aborting failure
    ///
    /// On success the summary carries a snapshot of the variables. The store
    /// itself is discarded whichever way the run ends.
    pub async fn execute(&mut self, workflow: &Workflow) -> Result<RunSummary, RunError> {
        let start = Instant::now();
        self.state = RunState::Running;
        tracing::info!(
            "Starting workflow '{}' with {} steps",
            workflow.name,
            workflow.steps.len()
        );

        let result = self.run_steps(workflow).await.map(|mut summary| {
            summary.variables = self.variables.to_map();
            summary
        });
        self.variables.reset();

        self.state = match &result {
            Ok(_) => RunState::Completed,
            Err(e) if e.is_cancellation() => RunState::Cancelled,
            Err(_) => RunState::Failed,
        };

        match &result {
            Ok(summary) => tracing::info!(
                "Workflow '{}' completed in {:?}: {} run, {} skipped, {} warnings",
                workflow.name,
                start.elapsed(),
                summary.steps_run,
                summary.steps_skipped,
                summary.warnings.len()
            ),
            Err(e) => tracing::info!("Workflow '{}' stopped: {}", workflow.name, e),
        }

        result
    }

    async fn run_steps(&mut self, workflow: &Workflow) -> Result<RunSummary, RunError> {
        let total = workflow.steps.len();
        let mut summary = RunSummary {
            steps_total: total,
            ..Default::default()
        };

        for (offset, step) in workflow.steps.iter().enumerate() {
            let index = offset + 1;

            if !condition::evaluate(step.condition.as_ref(), &self.variables, index)? {
                tracing::debug!("Skipping step {}/{} ({})", index, total, step.type_name());
                summary.steps_skipped += 1;
                continue;
            }

            tracing::debug!("Running step {}/{} ({})", index, total, step.type_name());
            let outcome = self.run_step(step, index, total).await?;
            summary.steps_run += 1;

            if let StepOutcome::Warning(message) = outcome {
                summary.warnings.push(RunWarning {
                    step: index,
                    message,
                });
            }
        }

        Ok(summary)
    }

    async fn run_step(
        &mut self,
        step: &Step,
        index: usize,
        total: usize,
    ) -> Result<StepOutcome, RunError> {
        let ctx = StepContext {
            index,
            total,
            interaction: self.interaction.as_ref(),
            runner: self.runner.as_ref(),
        };
        let store = &mut self.variables;

        match &step.kind {
            StepKind::Input(input) => steps::run_input(input, &ctx, store).await,
            StepKind::Select(select) => steps::run_select(select, &ctx, store).await,
            StepKind::Confirm(confirm) => steps::run_confirm(confirm, &ctx, store).await,
            StepKind::Command(command) => steps::run_command(command, &ctx, store).await,
            StepKind::Unknown { step_type } => Err(RunError::UnknownStepType {
                step: index,
                step_type: step_type.clone(),
            }),
        }
    }
}
