//! Application configuration
//!
//! Settings that apply to every subcommand, resolved once from CLI flags and
//! the environment.

use anyhow::Result;
use std::path::PathBuf;

use crate::storage::default_store_path;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Location of the workflow store file
    pub store_path: PathBuf,
}

impl AppConfig {
    /// Create a new application configuration
    ///
    /// An explicit `store` (from `--store` or `CMDR_STORE`) wins; otherwise the
    /// default store location is used.
    pub fn new(verbose: u8, store: Option<PathBuf>) -> Result<Self> {
        let store_path = match store {
            Some(path) => path,
            None => default_store_path()
                .map_err(|e| anyhow::anyhow!("Failed to locate store: {}", e))?,
        };

        Ok(Self {
            verbose,
            store_path,
        })
    }

    /// Set the store location
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = path;
        self
    }

    /// Get the log filter based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            store_path: PathBuf::from(crate::storage::STORE_FILE_NAME),
        }
    }
}
