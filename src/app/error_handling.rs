//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

use crate::error::{describe_error_code, CmdrError};

/// Handle fatal errors and exit with appropriate status code
///
/// - For `CmdrError`: Shows user message always, developer message in verbose mode
/// - For other errors: Shows error message and exits with 1
///
/// A cancelled run prints only "cancelled" and exits with 130.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    std::process::exit(report_error(&error, verbose))
}

/// Print `error` to stderr and return the exit code it maps to
pub fn report_error(error: &anyhow::Error, verbose: u8) -> i32 {
    if let Some(cmdr_err) = error.downcast_ref::<CmdrError>() {
        if cmdr_err.is_cancellation() {
            tracing::debug!("Run cancelled: {}", cmdr_err);
            eprintln!("{}", cmdr_err.user_message());
            return cmdr_err.exit_code();
        }

        error!("Fatal error: {}", error);
        eprintln!("{}", cmdr_err.user_message());

        // Show developer message with full context chain in verbose mode
        if verbose >= 1 {
            eprintln!("\n{}", describe_code(cmdr_err.code()));
            eprintln!("Context Chain:\n{}", cmdr_err.developer_message());
        }

        cmdr_err.exit_code()
    } else {
        error!("Fatal error: {}", error);
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    }
}

/// `E3004: Workflow not found in store`
fn describe_code(code: u16) -> String {
    format!("E{code:04}: {}", describe_error_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::RunError;

    #[test]
    fn test_report_cancellation() {
        let err = anyhow::Error::new(CmdrError::from(RunError::InputCancelled { step: 1 }));
        assert_eq!(report_error(&err, 0), 130);
    }

    #[test]
    fn test_report_validation() {
        let err = anyhow::Error::new(CmdrError::validation("x", vec![]));
        assert_eq!(report_error(&err, 1), 2);
    }

    #[test]
    fn test_describe_code() {
        assert_eq!(describe_code(3004), "E3004: Workflow not found in store");
        assert_eq!(describe_code(42), "E0042: Unknown error code");
    }

    #[test]
    fn test_report_plain_error() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(report_error(&err, 0), 1);
    }
}
