//! Configuration management for the optimizer
//!
//! This module handles loading, validation, and layering of run configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{OptimizerError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the optimizer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Optimizer configuration
    pub optimizer: OptimizerConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| OptimizerError::config(format!("Failed to read config file: {}", e)))?;

        let optimizer: OptimizerConfig = serde_yaml::from_str(&content)
            .map_err(|e| OptimizerError::config(format!("Failed to parse config: {}", e)))?;

        let config = Self { optimizer };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn roots(&self) -> &[String] {
        &self.optimizer.roots
    }

    pub fn retry(&self) -> &RetrySettings {
        &self.optimizer.retry
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.optimizer.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        Validate::validate(&self.optimizer)
            .map_err(|e| OptimizerError::config(format!("Optimizer config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Apply a higher-precedence layer; every setting it carries wins
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.optimizer = overrides.apply(self.optimizer);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.optimizer).map_err(|e| {
            OptimizerError::config(format!("Failed to serialize config to JSON: {}", e))
        })
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.optimizer).map_err(|e| {
            OptimizerError::config(format!("Failed to serialize config to YAML: {}", e))
        })
    }
}
