//! Workflow definitions and the files they are authored in

pub mod loader;
pub mod workflow;

pub use loader::{load_definitions, parse_definitions};
pub use workflow::{
    slugify, CommandStep, Condition, ConditionOperator, ConfirmStep, InputStep, SelectOption,
    SelectStep, Step, StepKind, ValidationIssue, Workflow,
};
