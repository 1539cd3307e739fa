//! The four step primitives
//!
//! Each primitive renders its text through the variable store, talks to the
//! user or the shell, and may write one variable back.

use super::error::RunError;
use super::variables::VariableStore;
use crate::config::workflow::{CommandStep, ConfirmStep, InputStep, SelectStep};
use crate::interaction::{PromptOutcome, UserInteraction};
use crate::subprocess::{ProcessCommandBuilder, ProcessError, ProcessOutput, ProcessRunner};

/// Position of the current step plus the collaborators a primitive may use
pub struct StepContext<'a> {
    /// 1-based
    pub index: usize,
    pub total: usize,
    pub interaction: &'a dyn UserInteraction,
    pub runner: &'a dyn ProcessRunner,
}

impl StepContext<'_> {
    fn interaction_error(&self, source: anyhow::Error) -> RunError {
        RunError::Interaction {
            step: self.index,
            source,
        }
    }
}

/// How a primitive finished when it did not abort the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// A command failed but its step tolerates failure
    Warning(String),
}

pub async fn run_input(
    step: &InputStep,
    ctx: &StepContext<'_>,
    store: &mut VariableStore,
) -> Result<StepOutcome, RunError> {
    let prompt = store.parse(&step.prompt);
    let help = step.help_text.as_deref().map(|h| store.parse(h));

    let outcome = ctx
        .interaction
        .prompt_text(&prompt, help.as_deref())
        .await
        .map_err(|e| ctx.interaction_error(e))?;

    match outcome {
        PromptOutcome::Answered(text) => {
            store.set(step.variable.as_str(), text.trim());
            Ok(StepOutcome::Done)
        }
        PromptOutcome::Cancelled => Err(RunError::InputCancelled { step: ctx.index }),
    }
}

pub async fn run_select(
    step: &SelectStep,
    ctx: &StepContext<'_>,
    store: &mut VariableStore,
) -> Result<StepOutcome, RunError> {
    let prompt = store.parse(&step.prompt);
    let labels: Vec<String> = step.options.iter().map(|o| store.parse(o.label())).collect();

    let outcome = ctx
        .interaction
        .prompt_choice(&prompt, &labels)
        .await
        .map_err(|e| ctx.interaction_error(e))?;

    match outcome {
        PromptOutcome::Answered(index) => {
            let option = step.options.get(index).ok_or_else(|| {
                ctx.interaction_error(anyhow::anyhow!(
                    "selection {} out of range for {} options",
                    index,
                    step.options.len()
                ))
            })?;
            let value = store.parse(option.value());
            store.set(step.variable.as_str(), value);
            Ok(StepOutcome::Done)
        }
        PromptOutcome::Cancelled => Err(RunError::SelectionCancelled { step: ctx.index }),
    }
}

pub async fn run_confirm(
    step: &ConfirmStep,
    ctx: &StepContext<'_>,
    store: &mut VariableStore,
) -> Result<StepOutcome, RunError> {
    let prompt = store.parse(&step.prompt);

    let outcome = ctx
        .interaction
        .prompt_yes_no(&prompt)
        .await
        .map_err(|e| ctx.interaction_error(e))?;

    match outcome {
        PromptOutcome::Answered(yes) => {
            store.set(step.variable.as_str(), if yes { "true" } else { "false" });
            Ok(StepOutcome::Done)
        }
        PromptOutcome::Cancelled => Err(RunError::ConfirmCancelled { step: ctx.index }),
    }
}

pub async fn run_command(
    step: &CommandStep,
    ctx: &StepContext<'_>,
    store: &mut VariableStore,
) -> Result<StepOutcome, RunError> {
    let command = store.parse(&step.command);
    let label = match step.description.as_deref() {
        Some(description) if !description.trim().is_empty() => store.parse(description),
        _ => format!("Running: {command}"),
    };
    ctx.interaction
        .display_progress(&format!("[{}/{}] {}", ctx.index, ctx.total, label));

    let process = ProcessCommandBuilder::shell(&command)
        .capture_output(step.capture_output)
        .interactive(step.interactive)
        .build();

    let failure = match ctx.runner.run(process).await {
        Ok(output) => {
            store_captured(step, &output, store);
            if output.status.success() {
                return Ok(StepOutcome::Done);
            }
            CommandFailure {
                reason: output.status.to_string(),
                exit_code: output.status.code(),
                stderr: step.capture_output.then(|| output.stderr.trim().to_string()),
            }
        }
        Err(error) => CommandFailure::spawn(error),
    };

    if step.die_on_error {
        return Err(RunError::CommandFailed {
            step: ctx.index,
            command,
            reason: failure.reason,
            exit_code: failure.exit_code,
            stderr: failure.stderr,
        });
    }

    let message = format!("Command failed ({}): {}", failure.reason, command);
    tracing::warn!("step {}: {}", ctx.index, message);
    ctx.interaction.display_warning(&message);
    Ok(StepOutcome::Warning(message))
}

struct CommandFailure {
    reason: String,
    exit_code: Option<i32>,
    stderr: Option<String>,
}

impl CommandFailure {
    fn spawn(error: ProcessError) -> Self {
        Self {
            reason: error.to_string(),
            exit_code: None,
            stderr: None,
        }
    }
}

fn store_captured(step: &CommandStep, output: &ProcessOutput, store: &mut VariableStore) {
    if !step.capture_output {
        return;
    }
    if let Some(variable) = step.output_variable.as_deref() {
        store.set(variable, output.stdout.trim());
    }
}
