//! Workflow definition model
//!
//! A workflow is a named, ordered list of steps. Each step is one of four kinds
//! (input, select, confirm, command) and may be gated by a condition on a
//! variable produced by an earlier step.
//!
//! The persisted form of a step is a flat record with a `type` tag. It is
//! converted into the closed [`StepKind`] enum on load so that only the fields
//! relevant to a step kind are reachable from code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Convert a display name into a stable identifier.
///
/// Lowercases the text, collapses every run of non-alphanumeric characters to
/// a single hyphen and trims hyphens from both ends.
/// e.g. "My Cool Workflow!" -> "my-cool-workflow"
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// A complete workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Stable identifier, derived from the name when empty
    #[serde(default, alias = "key")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional free text shown before running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Steps in authored order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Workflow {
    /// Create an empty workflow whose id is derived from `name`
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: slugify(&name),
            name,
            description: None,
            steps: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Fill in the id from the name if it has not been set
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = slugify(&self.name);
        }
    }

    /// Check the definition for authoring defects without running anything
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::workflow("workflow name is empty"));
        }
        if self.id.is_empty() && slugify(&self.name).is_empty() {
            issues.push(ValidationIssue::workflow(
                "workflow id is empty and cannot be derived from the name",
            ));
        }

        for (i, step) in self.steps.iter().enumerate() {
            step.collect_issues(i + 1, &mut issues);
        }

        issues
    }
}

/// A problem found while validating a workflow definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// 1-based step index, `None` for workflow-level problems
    pub step: Option<usize>,
    pub message: String,
}

impl ValidationIssue {
    fn workflow(message: impl Into<String>) -> Self {
        Self {
            step: None,
            message: message.into(),
        }
    }

    fn step(index: usize, message: impl Into<String>) -> Self {
        Self {
            step: Some(index),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(index) => write!(f, "step {}: {}", index, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// One unit of interaction or execution within a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub struct Step {
    pub kind: StepKind,
    /// Gate deciding whether the step runs at all
    pub condition: Option<Condition>,
}

impl Step {
    pub fn input(prompt: impl Into<String>, variable: impl Into<String>) -> Self {
        StepKind::Input(InputStep {
            prompt: prompt.into(),
            variable: variable.into(),
            help_text: None,
        })
        .into()
    }

    pub fn select(
        prompt: impl Into<String>,
        variable: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        StepKind::Select(SelectStep {
            prompt: prompt.into(),
            variable: variable.into(),
            options,
        })
        .into()
    }

    pub fn confirm(prompt: impl Into<String>, variable: impl Into<String>) -> Self {
        StepKind::Confirm(ConfirmStep {
            prompt: prompt.into(),
            variable: variable.into(),
        })
        .into()
    }

    pub fn command(command: CommandStep) -> Self {
        StepKind::Command(command).into()
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The `type` tag this step serializes under
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    fn collect_issues(&self, index: usize, issues: &mut Vec<ValidationIssue>) {
        match &self.kind {
            StepKind::Input(step) => {
                require_prompt(index, &step.prompt, issues);
                require_variable(index, &step.variable, issues);
            }
            StepKind::Select(step) => {
                require_prompt(index, &step.prompt, issues);
                require_variable(index, &step.variable, issues);
                if step.options.is_empty() {
                    issues.push(ValidationIssue::step(index, "select step has no options"));
                }
            }
            StepKind::Confirm(step) => {
                require_prompt(index, &step.prompt, issues);
                require_variable(index, &step.variable, issues);
            }
            StepKind::Command(step) => {
                if step.command.trim().is_empty() {
                    issues.push(ValidationIssue::step(index, "command is empty"));
                }
            }
            StepKind::Unknown { step_type } => {
                issues.push(ValidationIssue::step(
                    index,
                    format!("unknown step type '{step_type}'"),
                ));
            }
        }

        if let Some(condition) = &self.condition {
            if condition.variable.is_empty() {
                issues.push(ValidationIssue::step(index, "condition has no variable"));
            }
            if let ConditionOperator::Unknown(op) = &condition.operator {
                issues.push(ValidationIssue::step(
                    index,
                    format!("unknown condition operator '{op}'"),
                ));
            }
        }
    }
}

fn require_prompt(index: usize, prompt: &str, issues: &mut Vec<ValidationIssue>) {
    if prompt.trim().is_empty() {
        issues.push(ValidationIssue::step(index, "prompt is empty"));
    }
}

fn require_variable(index: usize, variable: &str, issues: &mut Vec<ValidationIssue>) {
    if variable.is_empty() {
        issues.push(ValidationIssue::step(index, "variable name is empty"));
    }
}

impl From<StepKind> for Step {
    fn from(kind: StepKind) -> Self {
        Self {
            kind,
            condition: None,
        }
    }
}

/// The closed set of step kinds, each carrying only its own fields
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    Input(InputStep),
    Select(SelectStep),
    Confirm(ConfirmStep),
    Command(CommandStep),
    /// A `type` tag this version does not know; rejected when reached
    Unknown { step_type: String },
}

impl StepKind {
    pub fn type_name(&self) -> &str {
        match self {
            StepKind::Input(_) => "input",
            StepKind::Select(_) => "select",
            StepKind::Confirm(_) => "confirm",
            StepKind::Command(_) => "command",
            StepKind::Unknown { step_type } => step_type,
        }
    }
}

/// Free text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputStep {
    pub prompt: String,
    pub variable: String,
    pub help_text: Option<String>,
}

/// Single choice from an ordered option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStep {
    pub prompt: String,
    pub variable: String,
    pub options: Vec<SelectOption>,
}

/// Yes/no question; the variable receives `"true"` or `"false"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmStep {
    pub prompt: String,
    pub variable: String,
}

/// Shell command run through `sh -c`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandStep {
    pub command: String,
    /// Shown instead of the raw command when present
    pub description: Option<String>,
    pub capture_output: bool,
    pub output_variable: Option<String>,
    pub die_on_error: bool,
    pub interactive: bool,
}

impl CommandStep {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Capture stdout into `variable` instead of streaming it
    pub fn capture_into(mut self, variable: impl Into<String>) -> Self {
        self.capture_output = true;
        self.output_variable = Some(variable.into());
        self
    }

    pub fn die_on_error(mut self, die: bool) -> Self {
        self.die_on_error = die;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// An option of a select step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
    /// Display text doubling as the stored value
    Plain(String),
    Labeled {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
}

impl SelectOption {
    pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
        SelectOption::Labeled {
            label: label.into(),
            value: Some(value.into()),
        }
    }

    /// Text shown in the menu
    pub fn label(&self) -> &str {
        match self {
            SelectOption::Plain(text) => text,
            SelectOption::Labeled { label, .. } => label,
        }
    }

    /// Value stored when chosen, falling back to the label
    pub fn value(&self) -> &str {
        match self {
            SelectOption::Plain(text) => text,
            SelectOption::Labeled { label, value } => value.as_deref().unwrap_or(label),
        }
    }
}

impl From<&str> for SelectOption {
    fn from(text: &str) -> Self {
        SelectOption::Plain(text.to_string())
    }
}

/// Gate on a variable of the current run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub variable: String,
    pub operator: ConditionOperator,
    /// Operand for `equals` / `not_equals`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Condition {
    pub fn equals(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            operator: ConditionOperator::Equals,
            value: value.into(),
        }
    }

    pub fn not_equals(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            operator: ConditionOperator::NotEquals,
            value: value.into(),
        }
    }

    pub fn empty(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            operator: ConditionOperator::Empty,
            value: String::new(),
        }
    }

    pub fn not_empty(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            operator: ConditionOperator::NotEmpty,
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Empty,
    NotEmpty,
    /// Kept verbatim so the run can report it
    Unknown(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::Empty => "empty",
            ConditionOperator::NotEmpty => "not_empty",
            ConditionOperator::Unknown(op) => op,
        }
    }
}

impl FromStr for ConditionOperator {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "equals" => ConditionOperator::Equals,
            "not_equals" => ConditionOperator::NotEquals,
            "empty" => ConditionOperator::Empty,
            "not_empty" => ConditionOperator::NotEmpty,
            other => ConditionOperator::Unknown(other.to_string()),
        })
    }
}

impl From<String> for ConditionOperator {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(op) => op,
            Err(never) => match never {},
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat on-disk form of a step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawStep {
    #[serde(rename = "type")]
    step_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    prompt: String,
    #[serde(default, alias = "helpText", skip_serializing_if = "Option::is_none")]
    help_text: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    variable: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, alias = "captureOutput", skip_serializing_if = "is_false")]
    capture_output: bool,
    #[serde(default, alias = "outputVariable", skip_serializing_if = "Option::is_none")]
    output_variable: Option<String>,
    #[serde(default, alias = "dieOnError", skip_serializing_if = "is_false")]
    die_on_error: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    interactive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<RawStep> for Step {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let kind = match raw.step_type.as_str() {
            "input" => StepKind::Input(InputStep {
                prompt: raw.prompt,
                variable: raw.variable,
                help_text: non_empty(raw.help_text),
            }),
            "select" => StepKind::Select(SelectStep {
                prompt: raw.prompt,
                variable: raw.variable,
                options: raw.options,
            }),
            "confirm" => StepKind::Confirm(ConfirmStep {
                prompt: raw.prompt,
                variable: raw.variable,
            }),
            "command" => StepKind::Command(CommandStep {
                command: raw.command,
                description: non_empty(raw.description),
                capture_output: raw.capture_output,
                output_variable: non_empty(raw.output_variable),
                die_on_error: raw.die_on_error,
                interactive: raw.interactive,
            }),
            "" => return Err("step is missing its `type`".to_string()),
            other => StepKind::Unknown {
                step_type: other.to_string(),
            },
        };

        Ok(Step {
            kind,
            condition: raw.condition,
        })
    }
}

impl From<Step> for RawStep {
    fn from(step: Step) -> Self {
        let mut raw = RawStep {
            step_type: step.type_name().to_string(),
            condition: step.condition,
            ..Default::default()
        };

        match step.kind {
            StepKind::Input(input) => {
                raw.prompt = input.prompt;
                raw.variable = input.variable;
                raw.help_text = input.help_text;
            }
            StepKind::Select(select) => {
                raw.prompt = select.prompt;
                raw.variable = select.variable;
                raw.options = select.options;
            }
            StepKind::Confirm(confirm) => {
                raw.prompt = confirm.prompt;
                raw.variable = confirm.variable;
            }
            StepKind::Command(command) => {
                raw.command = command.command;
                raw.description = command.description;
                raw.capture_output = command.capture_output;
                raw.output_variable = command.output_variable;
                raw.die_on_error = command.die_on_error;
                raw.interactive = command.interactive;
            }
            StepKind::Unknown { .. } => {}
        }

        raw
    }
}
