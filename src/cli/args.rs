//! CLI argument structures
//!
//! This module defines the main CLI structure and all subcommand definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Record and replay interactive command workflows
#[derive(Parser)]
#[command(name = "cmdr")]
#[command(about = "cmdr - Record and replay interactive command workflows", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Workflow store file (default: ~/.config/cmdr/workflows.json)
    #[arg(long, value_name = "PATH", env = "CMDR_STORE", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a stored workflow (pick one from a menu when no id is given)
    Run {
        /// Id of the workflow to run
        id: Option<String>,
    },

    /// List stored workflows
    #[command(alias = "ls")]
    List,

    /// Print a stored workflow as YAML
    Show {
        /// Id of the workflow to print
        id: String,
    },

    /// Import workflows from a YAML or JSON file
    Import {
        /// File holding one workflow or a list of workflows
        file: PathBuf,

        /// Overwrite workflows that already exist
        #[arg(short, long)]
        force: bool,
    },

    /// Check a definition file without storing it
    Validate {
        /// File holding one workflow or a list of workflows
        file: PathBuf,
    },

    /// Delete a stored workflow
    #[command(alias = "rm")]
    Delete {
        /// Id of the workflow to delete
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}
