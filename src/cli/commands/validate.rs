//! Validate command implementation

use anyhow::Result;
use std::path::Path;

use crate::config::loader::load_definitions;
use crate::config::workflow::Workflow;
use crate::error::CmdrError;

/// Check a definition file and report every problem found
pub async fn run_validate_command(file: &Path) -> Result<()> {
    let workflows = load_definitions(file).await?;
    check_workflows(file, &workflows)?;
    println!(
        "✅ {}: {} valid",
        file.display(),
        match workflows.len() {
            1 => "1 workflow".to_string(),
            n => format!("{n} workflows"),
        }
    );
    Ok(())
}

/// Fail with every issue of every workflow, prefixed by the workflow id
pub fn check_workflows(file: &Path, workflows: &[Workflow]) -> Result<(), CmdrError> {
    let mut issues = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for workflow in workflows {
        for issue in workflow.validate() {
            issues.push(format!("{}: {}", workflow.id, issue));
        }
        if !seen.insert(workflow.id.as_str()) {
            issues.push(format!("{}: duplicate workflow id", workflow.id));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CmdrError::validation(
            format!("{} has {} problem(s)", file.display(), issues.len()),
            issues,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workflow::{SelectOption, Step};

    #[test]
    fn test_valid_workflows_pass() {
        let workflows = vec![Workflow::new("ok").with_step(Step::confirm("Sure?", "sure"))];
        assert!(check_workflows(Path::new("f.yaml"), &workflows).is_ok());
    }

    #[test]
    fn test_all_issues_are_reported() {
        let workflows = vec![
            Workflow::new("bad").with_step(Step::select("Pick", "choice", Vec::<SelectOption>::new())),
            Workflow::new("bad").with_step(Step::input("", "name")),
        ];

        let err = check_workflows(Path::new("f.yaml"), &workflows).unwrap_err();
        match err {
            CmdrError::Validation { issues, .. } => {
                assert_eq!(
                    issues,
                    vec![
                        "bad: step 1: select step has no options".to_string(),
                        "bad: step 1: prompt is empty".to_string(),
                        "bad: duplicate workflow id".to_string(),
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
