//! Tracing subscriber bootstrap.

use crate::error::{PinboardError, Result};
use tracing_subscriber::EnvFilter;

/// Installs a formatted tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this again once a global
/// subscriber exists is a no-op.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| PinboardError::ConfigError(format!("invalid log level `{level}`: {err}")))?;

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }

    Ok(())
}

/// Log level used when the configuration names none
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
