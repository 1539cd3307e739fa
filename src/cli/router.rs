//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use crate::app::AppConfig;
use crate::cli::args::Commands;
use crate::cli::commands::*;
use crate::storage::JsonFileStore;
use anyhow::Result;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Option<Commands>, config: &AppConfig) -> Result<()> {
    let store = JsonFileStore::new(&config.store_path);

    match command {
        // Running is the default when no subcommand is given
        None => run_workflow_command(&store, None).await,
        Some(Commands::Run { id }) => run_workflow_command(&store, id).await,
        Some(Commands::List) => run_list_command(&store).await,
        Some(Commands::Show { id }) => run_show_command(&store, &id).await,
        Some(Commands::Import { file, force }) => run_import_command(&store, &file, force).await,
        Some(Commands::Validate { file }) => run_validate_command(&file).await,
        Some(Commands::Delete { id, yes }) => run_delete_command(&store, &id, yes).await,
    }
}
