//! Optimizer configuration validators
//!
//! Validation implementations for OptimizerConfig, RetrySettings and LoggingConfig.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

/// Upper bound on attempts so a dead endpoint cannot stall a scan indefinitely
const MAX_ATTEMPTS_LIMIT: u32 = 10;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Validate for OptimizerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating optimizer configuration");

        for root in &self.roots {
            if root.trim().is_empty() {
                return Err("Root references cannot be empty".to_string());
            }
        }

        let mut seen = std::collections::HashSet::new();
        for root in &self.roots {
            if !seen.insert(root.as_str()) {
                return Err(format!("Root '{}' is listed more than once", root));
            }
        }

        self.retry.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl Validate for RetrySettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }

        if self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(format!(
                "max_attempts should not exceed {}",
                MAX_ATTEMPTS_LIMIT
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err("backoff_multiplier must be at least 1.0".to_string());
        }

        if self.max_delay_ms < self.base_delay_ms {
            return Err("max_delay_ms must not be smaller than base_delay_ms".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let level = self.level.trim();
        if level.is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        // Plain levels are checked here; full directives are left to EnvFilter
        if !level.contains('=') && !level.contains(',') {
            let lower = level.to_ascii_lowercase();
            if !LOG_LEVELS.contains(&lower.as_str()) {
                return Err(format!(
                    "Unknown log level '{}', expected one of {:?}",
                    level, LOG_LEVELS
                ));
            }
        }

        Ok(())
    }
}
