//! Inventory type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an entity in the inventory tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Platform-unique identifier (e.g. `group-v12`, `vm-1042`)
    pub id: String,
    /// Display name
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Permission directly assigned to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Identifier of the entity holding this permission
    pub entity_id: String,
    /// User or group the grant applies to
    pub principal: String,
    /// Opaque role identifier
    pub role: String,
    /// Whether the platform propagates the grant to descendants
    pub propagate: bool,
    /// Whether the principal is a group
    pub is_group: bool,
}

impl Permission {
    pub fn new(
        entity_id: impl Into<String>,
        principal: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            principal: principal.into(),
            role: role.into(),
            propagate: true,
            is_group: false,
        }
    }

    pub fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    pub fn with_group(mut self, is_group: bool) -> Self {
        self.is_group = is_group;
        self
    }

    /// Matching key for redundancy checks
    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.principal, &self.role)
    }
}

/// The (principal, role) pair two grants must share to be duplicates
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionKey {
    pub principal: String,
    pub role: String,
}

impl PermissionKey {
    pub fn new(principal: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            role: role.into(),
        }
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.principal, self.role)
    }
}
