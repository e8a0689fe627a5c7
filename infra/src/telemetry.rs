//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use otp_shared::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Returns
/// `Ok(false)` when a global subscriber was already installed, which makes
/// repeated calls (e.g. from several tests) harmless.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, InfrastructureError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e))
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    }
    .is_ok();

    if installed {
        tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
    }
    Ok(installed)
}
