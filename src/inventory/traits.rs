//! Collaborator traits implemented by the inventory platform
//!
//! The optimizer never talks to the platform directly; it is handed values
//! implementing these traits.

use async_trait::async_trait;

use super::error::InventoryError;
use super::types::{EntityRef, Permission};

/// Read access to the inventory tree
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Resolve a root reference (identifier or `/`-separated name path)
    async fn resolve(&self, reference: &str) -> Result<EntityRef, InventoryError>;

    /// Direct children of an entity, in platform order
    async fn children(&self, entity: &EntityRef) -> Result<Vec<EntityRef>, InventoryError>;

    /// Permissions assigned directly to an entity, inherited ones excluded
    async fn permissions(&self, entity: &EntityRef) -> Result<Vec<Permission>, InventoryError>;
}

/// Write access to entity permissions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionMutator: Send + Sync {
    /// Revoke the grant of `principal` on `entity`
    ///
    /// Implementations return [`InventoryError::NotFound`] when the grant is
    /// already absent; callers treat that as success.
    async fn remove_permission(
        &self,
        entity: &EntityRef,
        principal: &str,
        is_group: bool,
    ) -> Result<(), InventoryError>;
}
