//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level when it is set.

use crate::config::LoggingConfig;
use crate::utils::error::{OptimizerError, Result};
use tracing_subscriber::EnvFilter;

/// Build the env filter for a configured level
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|e| OptimizerError::config(format!("Invalid RUST_LOG directives: {}", e))),
        _ => EnvFilter::try_new(&config.level)
            .map_err(|e| OptimizerError::config(format!("Invalid log level '{}': {}", config.level, e))),
    }
}

/// Initialize the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| OptimizerError::internal(format!("Failed to initialize logging: {}", e)))
}
