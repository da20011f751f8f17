//! Inventory model and collaborator seams
//!
//! Entities, permissions, the traits the platform implements, and an
//! in-memory implementation backed by snapshot files.

mod error;
mod memory;
mod snapshot;
mod traits;
mod types;

pub use error::InventoryError;
pub use memory::{InMemoryInventory, RemovalCall};
pub use snapshot::{EntityNode, GrantSpec, InventorySnapshot, SnapshotFormat};
pub use traits::{InventoryReader, PermissionMutator};
pub use types::{EntityRef, Permission, PermissionKey};

#[cfg(test)]
pub use traits::{MockInventoryReader, MockPermissionMutator};
