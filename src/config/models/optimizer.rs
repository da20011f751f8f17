//! Optimizer run configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Report without removing anything
    #[serde(default = "default_true")]
    pub dry_run: bool,
    /// Root references (identifiers or `/`-separated name paths)
    #[serde(default)]
    pub roots: Vec<String>,
    /// Ignore ancestor grants that do not propagate to descendants
    #[serde(default)]
    pub respect_propagate: bool,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            roots: Vec::new(),
            respect_propagate: false,
            retry: RetrySettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}
