//! Persistence for workflow definitions
//!
//! Workflows are kept in a single JSON file, by default
//! `~/.config/cmdr/workflows.json`.

pub mod error;
pub mod file;
pub mod traits;


pub use error::{StorageError, StorageResult};
pub use file::JsonFileStore;
pub use traits::WorkflowStore;

use std::path::PathBuf;

/// File name of the store inside the config directory
pub const STORE_FILE_NAME: &str = "workflows.json";

/// Default location of the workflow store
pub fn default_store_path() -> StorageResult<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| StorageError::configuration("Could not determine home directory"))
        .map(|home| home.join(".config").join("cmdr").join(STORE_FILE_NAME))
}
