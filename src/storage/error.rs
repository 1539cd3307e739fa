//! Error types for the workflow store

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file exists but could not be decoded or encoded
    #[error("Serialization error in {path}: {message}")]
    Serialization { path: PathBuf, message: String },

    /// No workflow with the requested id
    #[error("Workflow not found: {0}")]
    NotFound(String),

    /// Store location could not be determined
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a serialization error for the file at `path`
    pub fn serialization<E: fmt::Display>(path: impl Into<PathBuf>, err: E) -> Self {
        Self::Serialization {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found<E: fmt::Display>(id: E) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Create a configuration error
    pub fn configuration<E: fmt::Display>(msg: E) -> Self {
        Self::Configuration(msg.to_string())
    }
}
