//! Redundant permission removal
//!
//! Walks an inventory tree depth-first and removes every directly assigned
//! permission whose (principal, role) pair is already granted on a strict
//! ancestor along the same path. Grants with no ancestor match are never
//! touched.

mod cancel;
mod context;
mod report;
mod system;
mod types;
mod walker;

// Re-export public types and structs
pub use cancel::CancellationHandle;
pub use context::{EffectivePermissionSet, GrantSource};
pub use report::OptimizeReport;
pub use system::PermissionOptimizer;
pub use types::{
    Ambiguity, RemovalAction, ReportEntry, ReportSummary, TraversalError, TraversalErrorKind,
};
