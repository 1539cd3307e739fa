//! Failure kinds that abort a workflow run

use thiserror::Error;

/// Why a run stopped before completing
///
/// Every variant carries the 1-based index of the step that raised it.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("step {step}: input cancelled")]
    InputCancelled { step: usize },

    #[error("step {step}: selection cancelled")]
    SelectionCancelled { step: usize },

    #[error("step {step}: confirmation cancelled")]
    ConfirmCancelled { step: usize },

    #[error("step {step}: command failed ({reason}){}", format_stderr(.stderr))]
    CommandFailed {
        step: usize,
        command: String,
        reason: String,
        exit_code: Option<i32>,
        stderr: Option<String>,
    },

    #[error("step {step}: unknown step type '{step_type}'")]
    UnknownStepType { step: usize, step_type: String },

    #[error("step {step}: unknown condition operator '{operator}'")]
    UnknownConditionOperator { step: usize, operator: String },

    #[error("step {step}: prompt failed: {source}")]
    Interaction {
        step: usize,
        #[source]
        source: anyhow::Error,
    },
}

fn format_stderr(stderr: &Option<String>) -> String {
    match stderr.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!("\nStderr: {text}"),
        _ => String::new(),
    }
}

impl RunError {
    /// 1-based index of the step the run stopped at
    pub fn step(&self) -> usize {
        match self {
            RunError::InputCancelled { step }
            | RunError::SelectionCancelled { step }
            | RunError::ConfirmCancelled { step }
            | RunError::CommandFailed { step, .. }
            | RunError::UnknownStepType { step, .. }
            | RunError::UnknownConditionOperator { step, .. }
            | RunError::Interaction { step, .. } => *step,
        }
    }

    /// The user aborted an interactive prompt
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            RunError::InputCancelled { .. }
                | RunError::SelectionCancelled { .. }
                | RunError::ConfirmCancelled { .. }
        )
    }

    /// The workflow definition itself is malformed
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            RunError::UnknownStepType { .. } | RunError::UnknownConditionOperator { .. }
        )
    }
}
