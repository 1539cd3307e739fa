//! Command implementation modules
//!
//! This module contains the implementation of each CLI command.
//! Each command is implemented as a separate module for better organization.

pub mod delete;
pub mod import;
pub mod list;
pub mod run;
pub mod show;
pub mod validate;

// Re-export command execution functions
pub use delete::run_delete_command;
pub use import::run_import_command;
pub use list::run_list_command;
pub use run::run_workflow_command;
pub use show::run_show_command;
pub use validate::run_validate_command;
