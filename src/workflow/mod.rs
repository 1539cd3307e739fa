//! Workflow execution engine
//!
//! The executor walks a [`Workflow`](crate::config::workflow::Workflow) step by
//! step. Conditions gate each step, primitives talk to the user or the shell,
//! and every value they produce lands in a run-scoped [`VariableStore`].

pub mod condition;
pub mod error;
pub mod executor;
pub mod steps;
pub mod variables;

pub use error::RunError;
pub use executor::{RunState, RunSummary, RunWarning, WorkflowExecutor};
pub use steps::{StepContext, StepOutcome};
pub use variables::VariableStore;
