//! Partial configuration layers
//!
//! Environment variables and command-line flags only carry the settings the
//! user actually set. A set value replaces the lower layer's value even when
//! it equals the default.

use super::*;
use crate::utils::error::{OptimizerError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Environment variable prefix for optimizer settings
pub const ENV_PREFIX: &str = "PERM_OPTIMIZER_";

/// Settings explicitly set by one configuration layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub dry_run: Option<bool>,
    pub roots: Option<Vec<String>>,
    pub respect_propagate: Option<bool>,
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

impl ConfigOverrides {
    /// Read `PERM_OPTIMIZER_*` environment variables
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration overrides from environment variables");
        Self::from_lookup(|suffix| env::var(format!("{}{}", ENV_PREFIX, suffix)).ok())
    }

    /// Read overrides through `lookup`, which maps a variable suffix such as
    /// `DRY_RUN` to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            dry_run: lookup("DRY_RUN")
                .map(|value| parse_bool("DRY_RUN", &value))
                .transpose()?,
            roots: lookup("ROOTS").map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|root| !root.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            respect_propagate: lookup("RESPECT_PROPAGATE")
                .map(|value| parse_bool("RESPECT_PROPAGATE", &value))
                .transpose()?,
            max_attempts: lookup("MAX_ATTEMPTS")
                .map(|value| parse_number("MAX_ATTEMPTS", &value))
                .transpose()?,
            base_delay_ms: lookup("BASE_DELAY_MS")
                .map(|value| parse_number("BASE_DELAY_MS", &value))
                .transpose()?,
            max_delay_ms: lookup("MAX_DELAY_MS")
                .map(|value| parse_number("MAX_DELAY_MS", &value))
                .transpose()?,
            log_level: lookup("LOG_LEVEL"),
            log_json: lookup("LOG_JSON")
                .map(|value| parse_bool("LOG_JSON", &value))
                .transpose()?,
        })
    }

    /// Stack `other` on top of this layer
    pub fn merge(self, other: Self) -> Self {
        Self {
            dry_run: other.dry_run.or(self.dry_run),
            roots: other.roots.or(self.roots),
            respect_propagate: other.respect_propagate.or(self.respect_propagate),
            max_attempts: other.max_attempts.or(self.max_attempts),
            base_delay_ms: other.base_delay_ms.or(self.base_delay_ms),
            max_delay_ms: other.max_delay_ms.or(self.max_delay_ms),
            log_level: other.log_level.or(self.log_level),
            log_json: other.log_json.or(self.log_json),
        }
    }

    /// Replace every setting of `config` this layer sets
    pub fn apply(self, mut config: OptimizerConfig) -> OptimizerConfig {
        if let Some(dry_run) = self.dry_run {
            config.dry_run = dry_run;
        }
        if let Some(roots) = self.roots {
            config.roots = roots;
        }
        if let Some(respect_propagate) = self.respect_propagate {
            config.respect_propagate = respect_propagate;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
        if let Some(base_delay_ms) = self.base_delay_ms {
            config.retry.base_delay_ms = base_delay_ms;
        }
        if let Some(max_delay_ms) = self.max_delay_ms {
            config.retry.max_delay_ms = max_delay_ms;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(json) = self.log_json {
            config.logging.json = json;
        }
        config
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(OptimizerError::config(format!(
            "Invalid {}{}: expected a boolean, got '{}'",
            ENV_PREFIX, name, other
        ))),
    }
}

fn parse_number<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| OptimizerError::config(format!("Invalid {}{}: {}", ENV_PREFIX, name, e)))
}
