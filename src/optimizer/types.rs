//! Optimizer report record types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::{EntityRef, InventoryError};

/// What happened to a redundant permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalAction {
    /// Revoked through the mutator
    Removed,
    /// Dry run: would have been revoked
    WouldRemove,
    /// The mutator rejected the removal
    RemovalFailed,
    /// Left in place because revoking the principal on this entity would
    /// also drop a grant that is not redundant
    Skipped,
}

impl RemovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Removed => "removed",
            Self::WouldRemove => "would-remove",
            Self::RemovalFailed => "removal-failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RemovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One redundant permission found during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub entity: EntityRef,
    /// Name path from the scanned root
    pub path: String,
    pub principal: String,
    pub role: String,
    pub is_group: bool,
    pub propagate: bool,
    pub action: RemovalAction,
    /// Ancestor whose grant makes this one redundant
    pub inherited_from: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Kind of a non-fatal failure recorded during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalErrorKind {
    /// Children or permissions could not be read; the subtree was skipped
    SubtreeRead,
    /// A removal request failed
    Removal,
}

/// A non-fatal failure recorded during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalError {
    pub kind: TraversalErrorKind,
    pub entity: EntityRef,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    pub message: String,
}

impl TraversalError {
    pub fn subtree_read(entity: &EntityRef, path: &str, error: &InventoryError) -> Self {
        Self {
            kind: TraversalErrorKind::SubtreeRead,
            entity: entity.clone(),
            path: path.to_string(),
            principal: None,
            message: error.to_string(),
        }
    }

    pub fn removal(entity: &EntityRef, path: &str, principal: &str, error: &InventoryError) -> Self {
        Self {
            kind: TraversalErrorKind::Removal,
            entity: entity.clone(),
            path: path.to_string(),
            principal: Some(principal.to_string()),
            message: error.to_string(),
        }
    }
}

/// Same (principal, role) assigned twice on one entity with differing
/// propagate flags; neither copy is touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub entity: EntityRef,
    pub path: String,
    pub principal: String,
    pub role: String,
    pub detail: String,
}

/// Counts derived from a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub entities_visited: usize,
    pub redundant: usize,
    pub removed: usize,
    pub would_remove: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub ambiguities: usize,
}
