//! Log output setup.
//!
//! Logs go to stderr. The level is taken from `RUST_LOG` and defaults to
//! `info`, which shows each harvester processed and each password change.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Call once, early in `main`.
pub fn init() -> color_eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to initialise logging: {}", e))
}
