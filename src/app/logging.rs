//! Logging configuration and initialization
//!
//! Logs go to stderr so they never interleave with prompts on stdout.

use crate::app::config::AppConfig;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the application
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(config.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(config.verbose >= 3) // Show line numbers for -vvv
        .try_init();

    debug!("cmdr started with verbosity level: {}", config.verbose);
    debug!("Workflow store: {}", config.store_path.display());
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
