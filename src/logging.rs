//! Structured logging setup.
//!
//! Logs go to stderr so page output on stdout stays clean for piping.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Pick the default filter directive from the CLI verbosity flags.
pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the flags.
///
/// Fails if a subscriber was already installed in this process.
pub fn init(verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
