//! Step gating against the run's variables

use super::error::RunError;
use super::variables::VariableStore;
use crate::config::workflow::{Condition, ConditionOperator};

/// Decide whether the step at `step` (1-based) should run
///
/// A missing condition always passes. Unset variables compare as the empty
/// string. An unrecognized operator is a configuration defect and fails the
/// run instead of silently passing.
pub fn evaluate(
    condition: Option<&Condition>,
    store: &VariableStore,
    step: usize,
) -> Result<bool, RunError> {
    let Some(condition) = condition else {
        return Ok(true);
    };

    let actual = store.value(&condition.variable);
    let passed = match &condition.operator {
        ConditionOperator::Equals => actual == condition.value,
        ConditionOperator::NotEquals => actual != condition.value,
        ConditionOperator::Empty => actual.is_empty(),
        ConditionOperator::NotEmpty => !actual.is_empty(),
        ConditionOperator::Unknown(operator) => {
            return Err(RunError::UnknownConditionOperator {
                step,
                operator: operator.clone(),
            })
        }
    };

    tracing::debug!(
        "Condition {} {} {:?} on step {} -> {}",
        condition.variable,
        condition.operator,
        condition.value,
        step,
        passed
    );
    Ok(passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(pairs: &[(&str, &str)]) -> VariableStore {
        pairs.iter().copied().collect()
    }

    fn passes(condition: &Condition, vars: &VariableStore) -> bool {
        evaluate(Some(condition), vars, 1).unwrap()
    }

    #[test]
    fn test_missing_condition_passes() {
        assert!(evaluate(None, &VariableStore::new(), 1).unwrap());
        assert!(evaluate(None, &store(&[("x", "")]), 1).unwrap());
    }

    #[test]
    fn test_equals_and_not_equals() {
        let vars = store(&[("env", "prod")]);
        assert!(passes(&Condition::equals("env", "prod"), &vars));
        assert!(!passes(&Condition::equals("env", "dev"), &vars));
        assert!(passes(&Condition::not_equals("env", "dev"), &vars));
        assert!(!passes(&Condition::not_equals("env", "prod"), &vars));
    }

    #[test]
    fn test_unset_variable_compares_as_empty() {
        let vars = VariableStore::new();
        assert!(!passes(&Condition::equals("flag", "yes"), &vars));
        assert!(passes(&Condition::equals("flag", ""), &vars));
        assert!(passes(&Condition::not_equals("flag", "yes"), &vars));
    }

    #[test]
    fn test_empty_is_true_for_unset_or_empty() {
        let condition = Condition::empty("x");
        assert!(passes(&condition, &VariableStore::new()));
        assert!(passes(&condition, &store(&[("x", "")])));
        assert!(!passes(&condition, &store(&[("x", "1")])));
    }

    #[test]
    fn test_not_empty() {
        let condition = Condition::not_empty("x");
        assert!(!passes(&condition, &VariableStore::new()));
        assert!(passes(&condition, &store(&[("x", "1")])));
    }

    #[test]
    fn test_value_is_ignored_by_emptiness_checks() {
        let condition = Condition {
            variable: "x".to_string(),
            operator: ConditionOperator::Empty,
            value: "ignored".to_string(),
        };
        assert!(passes(&condition, &VariableStore::new()));
    }

    #[test]
    fn test_unknown_operator_fails() {
        let condition = Condition {
            variable: "x".to_string(),
            operator: ConditionOperator::Unknown("matches".to_string()),
            value: "y".to_string(),
        };
        let err = evaluate(Some(&condition), &VariableStore::new(), 4).unwrap_err();
        match err {
            RunError::UnknownConditionOperator { step, operator } => {
                assert_eq!(step, 4);
                assert_eq!(operator, "matches");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
