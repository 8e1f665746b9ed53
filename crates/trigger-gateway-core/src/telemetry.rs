//! Logging setup for hosts that have not installed a `tracing` subscriber.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the configured level parses
const FALLBACK_FILTER: &str = "info";

/// Install a global subscriber built from `config`.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `false` when a
/// subscriber was already installed, e.g. by the hosting runtime; that
/// subscriber is left in place.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let (json_layer, plain_layer) = if config.json_format {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json_layer)
        .with(plain_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.level, json = config.json_format, "Logging initialized");
    }
    installed
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
