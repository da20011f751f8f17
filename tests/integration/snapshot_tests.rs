//! Snapshot file integration tests
//!
//! Load a snapshot from disk, optimize it, save the result and load it back.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::optimizer_for;
    use crate::common::{InventoryFactory, ReportAssertions};
    use perm_optimizer::{InMemoryInventory, InventorySnapshot, OptimizerError};
    use std::sync::Arc;
    use tempfile::TempDir;

    const YAML_SNAPSHOT: &str = r#"
entities:
  - id: group-d1
    name: Datacenters
    permissions:
      - principal: VSPHERE.LOCAL\ops
        role: Admin
        group: true
    children:
      - id: host-7
        name: esx01
        permissions:
          - principal: VSPHERE.LOCAL\ops
            role: Admin
            group: true
          - principal: backup
            role: ReadOnly
            propagate: false
"#;

    #[tokio::test]
    async fn test_yaml_snapshot_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.yaml");
        tokio::fs::write(&path, YAML_SNAPSHOT).await.unwrap();

        let snapshot = InventorySnapshot::from_file(&path).await.unwrap();
        assert_eq!(snapshot.entity_count(), 2);
        assert_eq!(snapshot.permission_count(), 3);

        let grants = &snapshot.entities[0].children[0].permissions;
        assert!(grants[0].is_group);
        assert!(grants[0].propagate);
        assert!(!grants[1].propagate);

        let inventory = Arc::new(InMemoryInventory::from_snapshot(&snapshot).unwrap());
        let report = optimizer_for(&inventory)
            .optimize(&["Datacenters/esx01"], true)
            .await
            .unwrap();
        assert!(report.is_empty());

        let report = optimizer_for(&inventory)
            .optimize(&["Datacenters"], true)
            .await
            .unwrap();
        report.assert_redundant(&[("host-7", "VSPHERE.LOCAL\\ops", "Admin")]);
    }

    #[tokio::test]
    async fn test_apply_then_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("before.json");
        let output = dir.path().join("after.yaml");

        InventoryFactory::datacenter_snapshot()
            .save(&input)
            .await
            .unwrap();

        let snapshot = InventorySnapshot::from_file(&input).await.unwrap();
        assert_eq!(snapshot, InventoryFactory::datacenter_snapshot());

        let inventory = InventoryFactory::inventory(&snapshot);
        let report = optimizer_for(&inventory)
            .optimize(&["Datacenters"], false)
            .await
            .unwrap();
        report.assert_clean();

        inventory.to_snapshot().save(&output).await.unwrap();
        let reloaded = InventorySnapshot::from_file(&output).await.unwrap();

        assert_eq!(reloaded.entity_count(), snapshot.entity_count());
        assert_eq!(reloaded.permission_count(), snapshot.permission_count() - 1);

        let rerun = optimizer_for(&InventoryFactory::inventory(&reloaded))
            .optimize(&["Datacenters"], false)
            .await
            .unwrap();
        assert!(rerun.is_empty());
    }

    #[tokio::test]
    async fn test_missing_snapshot_file() {
        let dir = TempDir::new().unwrap();
        let result = InventorySnapshot::from_file(dir.path().join("absent.yaml")).await;
        assert!(matches!(result, Err(OptimizerError::Snapshot(_))));
    }

    #[test]
    fn test_malformed_snapshot() {
        let result = InventorySnapshot::from_yaml_str("entities:\n  - name: no-id\n");
        assert!(result.is_err());

        let result = InventorySnapshot::from_json_str("{\"entities\": [");
        assert!(matches!(result, Err(OptimizerError::Serialization(_))));
    }

    #[test]
    fn test_duplicate_entity_ids_rejected() {
        let snapshot = InventorySnapshot::from_yaml_str(
            "entities:\n  - id: a\n    name: one\n  - id: a\n    name: two\n",
        )
        .unwrap();
        assert!(InMemoryInventory::from_snapshot(&snapshot).is_err());
    }
}
