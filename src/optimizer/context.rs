//! Inherited permission context carried down one traversal path

use std::collections::HashMap;

use crate::inventory::{EntityRef, Permission, PermissionKey};

/// Where an inherited grant comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSource {
    pub entity: EntityRef,
    pub permission: Permission,
}

/// Grants held by the ancestors of the entity being visited
///
/// Values are never mutated in place; each child gets its own extended copy,
/// so one subtree's grants can never leak into a sibling's.
#[derive(Debug, Clone, Default)]
pub struct EffectivePermissionSet {
    grants: HashMap<PermissionKey, GrantSource>,
}

impl EffectivePermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PermissionKey) -> Option<&GrantSource> {
        self.grants.get(key)
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Copy of this set with `permissions` of `entity` added
    ///
    /// Keys already present keep their original source: the grant closest
    /// to the root wins.
    pub fn extended<'a, I>(&self, entity: &EntityRef, permissions: I) -> Self
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        let mut grants = self.grants.clone();
        for permission in permissions {
            grants
                .entry(permission.key())
                .or_insert_with(|| GrantSource {
                    entity: entity.clone(),
                    permission: permission.clone(),
                });
        }
        Self { grants }
    }
}
