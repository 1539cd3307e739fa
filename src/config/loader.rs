use std::path::Path;
use tokio::fs;

use super::workflow::Workflow;
use crate::error::{CmdrError, ErrorCode};

/// Read workflow definitions from a YAML or JSON file
///
/// `.json` files are parsed as JSON, everything else as YAML. Ids missing
/// from the file are derived from the workflow names.
pub async fn load_definitions(path: &Path) -> Result<Vec<Workflow>, CmdrError> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        let code = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorCode::CONFIG_NOT_FOUND
        } else {
            ErrorCode::CONFIG_GENERIC
        };
        CmdrError::config_with_code(code, e.to_string(), Some(path.to_path_buf())).with_source(e)
    })?;

    let mut workflows = parse_definitions(&content, is_json(path)).map_err(|e| match e {
        CmdrError::Config {
            code,
            message,
            source,
            ..
        } => CmdrError::Config {
            code,
            message,
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })?;

    for workflow in &mut workflows {
        workflow.ensure_id();
    }
    tracing::debug!(
        "Loaded {} workflow definitions from {}",
        workflows.len(),
        path.display()
    );
    Ok(workflows)
}

/// Parse definitions from text holding either one workflow or a list of them
pub fn parse_definitions(content: &str, json: bool) -> Result<Vec<Workflow>, CmdrError> {
    if json {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(vec![serde_json::from_value(value)?])
        }
    } else {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_sequence() {
            Ok(serde_yaml::from_value(value)?)
        } else {
            Ok(vec![serde_yaml::from_value(value)?])
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
