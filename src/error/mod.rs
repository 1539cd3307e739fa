use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::storage::StorageError;
use crate::workflow::RunError;

/// Exit code used when the user aborts a prompt
pub const EXIT_CANCELLED: i32 = 130;

/// The unified error type for the cmdr application
#[derive(Error, Debug)]
pub enum CmdrError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Workflow error: {message}")]
    Workflow {
        code: u16,
        message: String,
        workflow_name: Option<String>,
        step: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        issues: Vec<String>,
    },

    #[error("[E{code:04}] Cancelled: {message}")]
    Cancelled { code: u16, message: String },
}

impl CmdrError {
    /// Create a configuration error with specific code and path
    pub fn config_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a storage error with specific code
    pub fn storage_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a workflow error with specific code
    pub fn workflow_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Workflow {
            code,
            message: message.into(),
            workflow_name: None,
            step: None,
            source: None,
        }
    }

    /// A definition failed validation; `issues` are shown one per line
    pub fn validation(message: impl Into<String>, issues: Vec<String>) -> Self {
        Self::Validation {
            code: ErrorCode::VALIDATION_FAILED,
            message: message.into(),
            issues,
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            code: ErrorCode::WORKFLOW_CANCELLED,
            message: message.into(),
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Workflow { source: src, .. } => {
                *src = Some(source.into());
            }
            Self::Validation { .. } | Self::Cancelled { .. } => {}
        }
        self
    }

    /// Name the workflow a run error belongs to
    pub fn with_workflow(mut self, name: impl Into<String>) -> Self {
        if let Self::Workflow {
            workflow_name: ref mut w,
            ..
        } = self
        {
            *w = Some(name.into());
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::Validation { .. } => 2,
            Self::Workflow { code, .. }
                if *code == ErrorCode::WORKFLOW_UNKNOWN_STEP_TYPE
                    || *code == ErrorCode::WORKFLOW_UNKNOWN_OPERATOR =>
            {
                2
            }
            Self::Cancelled { .. } => EXIT_CANCELLED,
            Self::Storage { .. } | Self::Workflow { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Storage { code, .. }
            | Self::Workflow { code, .. }
            | Self::Validation { code, .. }
            | Self::Cancelled { code, .. } => *code,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, path, .. } => match path {
                Some(p) => format!("Configuration problem in {}: {}", p.display(), message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Storage { message, .. } => format!("Storage error: {}", message),
            Self::Workflow {
                message,
                workflow_name,
                step,
                ..
            } => {
                let mut msg = String::from("Workflow");
                if let Some(name) = workflow_name {
                    msg.push_str(&format!(" '{}'", name));
                }
                msg.push_str(" failed");
                if let Some(s) = step {
                    msg.push_str(&format!(" at step {}", s));
                }
                format!("{}: {}", msg, message)
            }
            Self::Validation { message, issues, .. } => {
                let mut msg = format!("Validation error: {}", message);
                for issue in issues {
                    msg.push_str(&format!("\n  - {}", issue));
                }
                msg
            }
            Self::Cancelled { .. } => "cancelled".to_string(),
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        format!("{:#}", self)
    }
}

impl From<serde_yaml::Error> for CmdrError {
    fn from(err: serde_yaml::Error) -> Self {
        CmdrError::config_with_code(
            ErrorCode::CONFIG_INVALID_YAML,
            format!("Invalid YAML: {err}"),
            None,
        )
        .with_source(err)
    }
}

impl From<serde_json::Error> for CmdrError {
    fn from(err: serde_json::Error) -> Self {
        CmdrError::config_with_code(
            ErrorCode::CONFIG_INVALID_JSON,
            format!("Invalid JSON: {err}"),
            None,
        )
        .with_source(err)
    }
}

impl From<StorageError> for CmdrError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => CmdrError::storage_with_code(
                ErrorCode::STORAGE_NOT_FOUND,
                format!("no workflow with id '{id}'"),
            ),
            StorageError::Io(io_err) => {
                CmdrError::storage_with_code(ErrorCode::STORAGE_IO_ERROR, io_err.to_string())
                    .with_source(io_err)
            }
            StorageError::Serialization { path, message } => CmdrError::storage_with_code(
                ErrorCode::STORAGE_CORRUPTED,
                format!("{} is not a valid store file: {}", path.display(), message),
            ),
            StorageError::Configuration(msg) => {
                CmdrError::config_with_code(ErrorCode::CONFIG_PATH_ERROR, msg, None)
            }
        }
    }
}

impl From<RunError> for CmdrError {
    fn from(err: RunError) -> Self {
        if err.is_cancellation() {
            return CmdrError::cancelled(err.to_string());
        }

        let code = match &err {
            RunError::UnknownStepType { .. } => ErrorCode::WORKFLOW_UNKNOWN_STEP_TYPE,
            RunError::UnknownConditionOperator { .. } => ErrorCode::WORKFLOW_UNKNOWN_OPERATOR,
            RunError::Interaction { .. } => ErrorCode::WORKFLOW_INTERACTION_FAILED,
            _ => ErrorCode::WORKFLOW_STEP_FAILED,
        };

        let step = err.step();
        let full = err.to_string();
        // The step index is reported separately
        let message = full
            .strip_prefix(&format!("step {step}: "))
            .map(str::to_string)
            .unwrap_or_else(|| full.clone());

        CmdrError::Workflow {
            code,
            message,
            workflow_name: None,
            step: Some(step),
            source: None,
        }
        .with_source(err)
    }
}
