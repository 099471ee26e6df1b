//! Logging setup for the `dirsnap` binary.
//!
//! Installs a global `tracing` subscriber writing to stderr. `RUST_LOG`
//! takes precedence; otherwise the level is `warn`, or `debug` for this
//! crate when verbose output is requested.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "warn,dirsnap=debug" } else { "warn" }
}

/// Initialize stderr logging.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
