//! Test fixtures and inventory factories
//!
//! All factories build real in-memory inventories, not mocks.

use perm_optimizer::utils::error::RetryConfig;
use perm_optimizer::{EntityNode, GrantSpec, InMemoryInventory, InventorySnapshot, PermissionOptimizer};
use std::sync::Arc;
use std::time::Duration;

/// Factory for inventory snapshots and the inventories built from them
pub struct InventoryFactory;

impl InventoryFactory {
    /// Datacenter tree with one redundant grant on `vm-web`
    ///
    /// ```text
    /// Datacenters            alice/Admin
    /// └── Prod               bob/ReadOnly
    ///     ├── web            (none)
    ///     │   └── vm-web     alice/Admin, carol/Operator
    ///     └── db             bob/Admin
    /// ```
    pub fn datacenter_snapshot() -> InventorySnapshot {
        InventorySnapshot::new(vec![
            EntityNode::new("group-d1", "Datacenters")
                .grant("alice", "Admin")
                .child(
                    EntityNode::new("datacenter-2", "Prod")
                        .grant("bob", "ReadOnly")
                        .child(
                            EntityNode::new("group-v3", "web").child(
                                EntityNode::new("vm-10", "vm-web")
                                    .grant("alice", "Admin")
                                    .grant("carol", "Operator"),
                            ),
                        )
                        .child(EntityNode::new("group-v4", "db").grant("bob", "Admin")),
                ),
        ])
    }

    /// Two unrelated top-level trees granting the same key
    pub fn twin_roots_snapshot() -> InventorySnapshot {
        InventorySnapshot::new(vec![
            EntityNode::new("root-a", "A")
                .grant("ops", "Admin")
                .child(EntityNode::new("a-1", "a1").grant("ops", "Admin")),
            EntityNode::new("root-b", "B").child(EntityNode::new("b-1", "b1").grant("ops", "Admin")),
        ])
    }

    /// Tree mixing group and user grants and a non-propagating grant
    pub fn mixed_snapshot() -> InventorySnapshot {
        InventorySnapshot::new(vec![
            EntityNode::new("folder-1", "Folders")
                .with_grant(group_grant("VSPHERE\\admins", "Admin"))
                .with_grant(GrantSpec {
                    principal: "auditor".to_string(),
                    role: "ReadOnly".to_string(),
                    propagate: false,
                    is_group: false,
                })
                .child(
                    EntityNode::new("vm-1", "vm1")
                        .with_grant(group_grant("VSPHERE\\admins", "Admin"))
                        .grant("VSPHERE\\admins", "Admin")
                        .grant("auditor", "ReadOnly"),
                ),
        ])
    }

    /// Single chain `depth` deep with the same grant on every level
    pub fn chain_snapshot(depth: usize) -> InventorySnapshot {
        let mut node = EntityNode::new(format!("e-{}", depth - 1), format!("level{}", depth - 1))
            .grant("ops", "Admin");
        for level in (0..depth - 1).rev() {
            node = EntityNode::new(format!("e-{}", level), format!("level{}", level))
                .grant("ops", "Admin")
                .child(node);
        }
        InventorySnapshot::new(vec![node])
    }

    pub fn inventory(snapshot: &InventorySnapshot) -> Arc<InMemoryInventory> {
        Arc::new(InMemoryInventory::from_snapshot(snapshot).expect("valid snapshot"))
    }

    pub fn datacenter() -> Arc<InMemoryInventory> {
        Self::inventory(&Self::datacenter_snapshot())
    }
}

fn group_grant(principal: &str, role: &str) -> GrantSpec {
    GrantSpec {
        principal: principal.to_string(),
        role: role.to_string(),
        propagate: true,
        is_group: true,
    }
}

/// Optimizer over `inventory` with fast retries
pub fn optimizer_for(inventory: &Arc<InMemoryInventory>) -> PermissionOptimizer {
    PermissionOptimizer::new(inventory.clone(), inventory.clone()).with_retry(RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff_multiplier: 2.0,
        jitter: false,
    })
}
