//! # perm-optimizer
//!
//! Removes redundant explicit permissions from a virtualization inventory.
//!
//! A permission is redundant when a strict ancestor on the same path already
//! grants the same principal the same role; the platform's own propagation
//! keeps effective access unchanged once it is removed.
//!
//! ## Features
//!
//! - **Ancestor-wins scan**: depth-first walk with a per-path inherited context
//! - **Dry run**: report what would be removed without touching anything
//! - **Partial-failure tolerant**: unreadable subtrees and failed removals are
//!   recorded, the scan continues
//! - **Pluggable platform**: the inventory is reached only through the
//!   [`InventoryReader`] and [`PermissionMutator`] traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perm_optimizer::{InMemoryInventory, InventorySnapshot, PermissionOptimizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let snapshot = InventorySnapshot::from_file("inventory.yaml").await?;
//!     let inventory = Arc::new(InMemoryInventory::from_snapshot(&snapshot)?);
//!
//!     let optimizer = PermissionOptimizer::new(inventory.clone(), inventory.clone());
//!     let report = optimizer.optimize(&["Datacenters"], true).await?;
//!
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod inventory;
pub mod optimizer;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use inventory::{
    EntityNode, EntityRef, GrantSpec, InMemoryInventory, InventoryError, InventoryReader,
    InventorySnapshot, Permission, PermissionKey, PermissionMutator,
};
pub use optimizer::{
    CancellationHandle, OptimizeReport, PermissionOptimizer, RemovalAction, ReportEntry,
};
pub use utils::error::{OptimizerError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
    /// Cargo profile (`debug` or `release`)
    pub profile: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
            profile: option_env!("BUILD_PROFILE").unwrap_or("unknown"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (git {}, {} build at {}, {})",
            self.version, self.git_hash, self.profile, self.build_time, self.rust_version
        )
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
