//! Errors reported by inventory collaborators

use thiserror::Error;

/// Error returned by an [`InventoryReader`](super::InventoryReader) or
/// [`PermissionMutator`](super::PermissionMutator)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The entity or grant no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// The session lacks the privilege for the call
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Network or API transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Anything else the platform reported
    #[error("Inventory error: {0}")]
    Other(String),
}

impl InventoryError {
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }

    /// Only transport failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
