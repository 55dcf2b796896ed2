//! Console tracing for the CLI
//!
//! `RUST_LOG` takes precedence; otherwise `--debug` selects the `debug`
//! level and the default is `info`. Log lines go to stderr so that command
//! output on stdout stays machine readable.

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Install the global fmt subscriber
pub fn init_tracing(debug: bool) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| AppError::Configuration(format!("Failed to initialize logging: {}", e)))
}
