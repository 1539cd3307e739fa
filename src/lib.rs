//! # cmdr
//!
//! Record reusable, multi-step interactive procedures ("workflows") once and
//! replay them: prompt for input, offer a choice, ask for confirmation or run
//! a shell command, with later steps able to use the values earlier ones
//! produced.
//!
//! ## Usage
//!
//! ```bash
//! cmdr import deploy.yaml
//! cmdr run deploy
//! ```
//!
//! ## Modules
//!
//! - `app` - Application configuration, logging and fatal error reporting
//! - `cli` - Argument parsing and command handlers
//! - `config` - Workflow definition model and definition file loading
//! - `error` - Unified application error type with exit codes
//! - `interaction` - Terminal prompts and status display behind a mockable trait
//! - `storage` - JSON file store for workflow definitions
//! - `subprocess` - Process execution behind a mockable runner
//! - `workflow` - Variable store, condition evaluation, step primitives and executor
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod interaction;
pub mod storage;
pub mod subprocess;
pub mod workflow;
