/// Error code registry for cmdr
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 3000-3999: Storage errors
/// - 5000-5999: Workflow run errors
/// - 7000-7999: Validation errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_YAML: u16 = 1002;
    pub const CONFIG_INVALID_JSON: u16 = 1003;
    pub const CONFIG_PATH_ERROR: u16 = 1006;

    // Storage errors (3000-3999)
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_NOT_FOUND: u16 = 3004;
    pub const STORAGE_ALREADY_EXISTS: u16 = 3005;
    pub const STORAGE_CORRUPTED: u16 = 3006;

    // Workflow run errors (5000-5999)
    pub const WORKFLOW_STEP_FAILED: u16 = 5003;
    pub const WORKFLOW_CANCELLED: u16 = 5006;
    pub const WORKFLOW_UNKNOWN_STEP_TYPE: u16 = 5013;
    pub const WORKFLOW_UNKNOWN_OPERATOR: u16 = 5014;
    pub const WORKFLOW_INTERACTION_FAILED: u16 = 5015;
    pub const WORKFLOW_EMPTY_STORE: u16 = 5016;

    // Validation errors (7000-7999)
    pub const VALIDATION_FAILED: u16 = 7006;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Definition file not found",
        1002 => "Invalid YAML syntax in definition",
        1003 => "Invalid JSON syntax in definition",
        1006 => "Store path error",

        // Storage errors
        3001 => "Storage I/O error",
        3004 => "Workflow not found in store",
        3005 => "Workflow already exists in store",
        3006 => "Store file is corrupted",

        // Workflow run errors
        5003 => "Workflow step failed",
        5006 => "Workflow cancelled",
        5013 => "Unknown step type",
        5014 => "Unknown condition operator",
        5015 => "Prompt could not be shown",
        5016 => "No workflows stored",

        // Validation errors
        7006 => "Workflow definition is invalid",

        _ => "Unknown error code",
    }
}
