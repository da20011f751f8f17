//! In-memory inventory
//!
//! Implements both collaborator traits over a snapshot held in memory. Used
//! by the CLI to optimize exported permission dumps offline, and by tests to
//! inject read and removal failures.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::error::InventoryError;
use super::snapshot::{EntityNode, GrantSpec, InventorySnapshot};
use super::traits::{InventoryReader, PermissionMutator};
use super::types::{EntityRef, Permission};
use crate::utils::error::{OptimizerError, Result};

#[derive(Debug, Clone)]
struct Node {
    entity: EntityRef,
    children: Vec<String>,
    permissions: Vec<Permission>,
}

/// A removal request received by the in-memory mutator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalCall {
    pub entity_id: String,
    pub principal: String,
    pub is_group: bool,
}

#[derive(Debug, Default)]
struct State {
    nodes: HashMap<String, Node>,
    top_level: Vec<String>,
    read_failures: HashMap<String, InventoryError>,
    transient_read_failures: HashMap<String, u32>,
    removal_failures: HashMap<(String, String), InventoryError>,
    removal_calls: Vec<RemovalCall>,
}

/// Inventory tree kept in memory behind a lock
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    state: RwLock<State>,
}

impl InMemoryInventory {
    /// Build an inventory from a snapshot, rejecting duplicate identifiers
    pub fn from_snapshot(snapshot: &InventorySnapshot) -> Result<Self> {
        let mut state = State::default();

        for node in &snapshot.entities {
            state.top_level.push(node.id.clone());
            insert_node(&mut state.nodes, node)?;
        }

        debug!("Built in-memory inventory with {} entities", state.nodes.len());
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Export the current tree, including removals applied so far
    pub fn to_snapshot(&self) -> InventorySnapshot {
        let state = self.state.read();
        let entities = state
            .top_level
            .iter()
            .filter_map(|id| export_node(&state.nodes, id))
            .collect();
        InventorySnapshot::new(entities)
    }

    /// Top-level entities, in snapshot order
    pub fn top_level(&self) -> Vec<EntityRef> {
        let state = self.state.read();
        state
            .top_level
            .iter()
            .filter_map(|id| state.nodes.get(id).map(|node| node.entity.clone()))
            .collect()
    }

    pub fn entity(&self, id: &str) -> Option<EntityRef> {
        self.state.read().nodes.get(id).map(|node| node.entity.clone())
    }

    /// Permissions currently held by an entity
    pub fn permissions_of(&self, id: &str) -> Vec<Permission> {
        self.state
            .read()
            .nodes
            .get(id)
            .map(|node| node.permissions.clone())
            .unwrap_or_default()
    }

    /// Make every read of `id` fail with `error`
    pub fn fail_reads_on(&self, id: impl Into<String>, error: InventoryError) {
        self.state.write().read_failures.insert(id.into(), error);
    }

    /// Make the next `times` reads of `id` fail with a transport error
    pub fn fail_reads_transiently(&self, id: impl Into<String>, times: u32) {
        self.state
            .write()
            .transient_read_failures
            .insert(id.into(), times);
    }

    /// Make removals of `principal` on `id` fail with `error`
    pub fn fail_removals_on(
        &self,
        id: impl Into<String>,
        principal: impl Into<String>,
        error: InventoryError,
    ) {
        self.state
            .write()
            .removal_failures
            .insert((id.into(), principal.into()), error);
    }

    /// Removal requests received so far, in order
    pub fn removal_calls(&self) -> Vec<RemovalCall> {
        self.state.read().removal_calls.clone()
    }

    fn check_read(&self, entity: &EntityRef) -> std::result::Result<(), InventoryError> {
        if let Some(error) = self.state.read().read_failures.get(&entity.id) {
            return Err(error.clone());
        }

        let mut state = self.state.write();
        if let Some(remaining) = state.transient_read_failures.get_mut(&entity.id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(InventoryError::transport(format!(
                    "simulated transport failure reading {}",
                    entity.id
                )));
            }
        }
        Ok(())
    }

    fn resolve_path(state: &State, path: &str) -> Option<EntityRef> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let first = segments.next()?;

        let mut current = state
            .top_level
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .find(|node| node.entity.name == first)?;

        for segment in segments {
            current = current
                .children
                .iter()
                .filter_map(|id| state.nodes.get(id))
                .find(|node| node.entity.name == segment)?;
        }

        Some(current.entity.clone())
    }
}

fn insert_node(nodes: &mut HashMap<String, Node>, node: &EntityNode) -> Result<()> {
    if node.id.trim().is_empty() {
        return Err(OptimizerError::snapshot(format!(
            "Entity '{}' has an empty id",
            node.name
        )));
    }
    if nodes.contains_key(&node.id) {
        return Err(OptimizerError::snapshot(format!(
            "Duplicate entity id '{}'",
            node.id
        )));
    }

    let permissions = node
        .permissions
        .iter()
        .map(|grant| Permission {
            entity_id: node.id.clone(),
            principal: grant.principal.clone(),
            role: grant.role.clone(),
            propagate: grant.propagate,
            is_group: grant.is_group,
        })
        .collect();

    nodes.insert(
        node.id.clone(),
        Node {
            entity: EntityRef::new(&node.id, &node.name),
            children: node.children.iter().map(|child| child.id.clone()).collect(),
            permissions,
        },
    );

    for child in &node.children {
        insert_node(nodes, child)?;
    }
    Ok(())
}

fn export_node(nodes: &HashMap<String, Node>, id: &str) -> Option<EntityNode> {
    let node = nodes.get(id)?;
    Some(EntityNode {
        id: node.entity.id.clone(),
        name: node.entity.name.clone(),
        permissions: node
            .permissions
            .iter()
            .map(|permission| GrantSpec {
                principal: permission.principal.clone(),
                role: permission.role.clone(),
                propagate: permission.propagate,
                is_group: permission.is_group,
            })
            .collect(),
        children: node
            .children
            .iter()
            .filter_map(|child| export_node(nodes, child))
            .collect(),
    })
}

#[async_trait]
impl InventoryReader for InMemoryInventory {
    async fn resolve(&self, reference: &str) -> std::result::Result<EntityRef, InventoryError> {
        let state = self.state.read();

        if let Some(node) = state.nodes.get(reference) {
            return Ok(node.entity.clone());
        }

        Self::resolve_path(&state, reference)
            .ok_or_else(|| InventoryError::not_found(format!("no entity matches '{}'", reference)))
    }

    async fn children(
        &self,
        entity: &EntityRef,
    ) -> std::result::Result<Vec<EntityRef>, InventoryError> {
        self.check_read(entity)?;

        let state = self.state.read();
        let node = state
            .nodes
            .get(&entity.id)
            .ok_or_else(|| InventoryError::not_found(entity.id.clone()))?;

        Ok(node
            .children
            .iter()
            .filter_map(|id| state.nodes.get(id).map(|child| child.entity.clone()))
            .collect())
    }

    async fn permissions(
        &self,
        entity: &EntityRef,
    ) -> std::result::Result<Vec<Permission>, InventoryError> {
        self.check_read(entity)?;

        self.state
            .read()
            .nodes
            .get(&entity.id)
            .map(|node| node.permissions.clone())
            .ok_or_else(|| InventoryError::not_found(entity.id.clone()))
    }
}

#[async_trait]
impl PermissionMutator for InMemoryInventory {
    async fn remove_permission(
        &self,
        entity: &EntityRef,
        principal: &str,
        is_group: bool,
    ) -> std::result::Result<(), InventoryError> {
        let mut state = self.state.write();
        state.removal_calls.push(RemovalCall {
            entity_id: entity.id.clone(),
            principal: principal.to_string(),
            is_group,
        });

        if let Some(error) = state
            .removal_failures
            .get(&(entity.id.clone(), principal.to_string()))
        {
            warn!(entity = %entity.id, principal, "Simulated removal failure");
            return Err(error.clone());
        }

        let node = state
            .nodes
            .get_mut(&entity.id)
            .ok_or_else(|| InventoryError::not_found(entity.id.clone()))?;

        let before = node.permissions.len();
        node.permissions
            .retain(|permission| !(permission.principal == principal && permission.is_group == is_group));

        if node.permissions.len() == before {
            return Err(InventoryError::not_found(format!(
                "{} holds no grant for {}",
                entity.id, principal
            )));
        }
        Ok(())
    }
}
