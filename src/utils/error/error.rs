//! Error handling for the optimizer
//!
//! This module defines the crate-level error type returned by fallible operations.

use crate::inventory::InventoryError;
use thiserror::Error;

/// Result type alias for the optimizer
pub type Result<T> = std::result::Result<T, OptimizerError>;

/// Main error type for the optimizer
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A requested root could not be resolved; aborts the whole run
    #[error("Failed to resolve root '{reference}': {source}")]
    RootResolution {
        reference: String,
        #[source]
        source: InventoryError,
    },

    /// Inventory collaborator errors outside of a traversal
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Snapshot errors (malformed tree, duplicate identifiers)
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OptimizerError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn snapshot<S: Into<String>>(message: S) -> Self {
        Self::Snapshot(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn root_resolution<S: Into<String>>(reference: S, source: InventoryError) -> Self {
        Self::RootResolution {
            reference: reference.into(),
            source,
        }
    }

    /// Whether the error aborted a run before any entity was processed
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, Self::RootResolution { .. } | Self::Config(_) | Self::Validation(_))
    }
}
