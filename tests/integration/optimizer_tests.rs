//! Optimization run integration tests
//!
//! Full runs through `PermissionOptimizer` against in-memory inventories.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::optimizer_for;
    use crate::common::{InventoryFactory, ReportAssertions};
    use perm_optimizer::inventory::RemovalCall;
    use perm_optimizer::optimizer::TraversalErrorKind;
    use perm_optimizer::{InventoryError, OptimizerError, RemovalAction};

    // ==================== Dry Run ====================

    #[tokio::test]
    async fn test_dry_run_reports_without_mutation() {
        let inventory = InventoryFactory::datacenter();
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["Datacenters"], true).await.unwrap();

        report.assert_clean();
        report.assert_redundant(&[("vm-10", "alice", "Admin")]);
        report.assert_all(RemovalAction::WouldRemove);
        assert_eq!(report.entities_visited, 5);
        assert_eq!(report.entries[0].inherited_from.id, "group-d1");
        assert_eq!(report.entries[0].path, "Datacenters/Prod/web/vm-web");

        assert!(inventory.removal_calls().is_empty());
        assert_eq!(inventory.permissions_of("vm-10").len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_and_apply_agree() {
        let dry_inventory = InventoryFactory::datacenter();
        let dry = optimizer_for(&dry_inventory)
            .optimize(&["group-d1"], true)
            .await
            .unwrap();

        let live_inventory = InventoryFactory::datacenter();
        let live = optimizer_for(&live_inventory)
            .optimize(&["group-d1"], false)
            .await
            .unwrap();

        assert_eq!(dry.redundant_keys(), live.redundant_keys());
        assert!(dry.dry_run);
        assert!(!live.dry_run);
        assert_eq!(dry_inventory.removal_calls().len(), 0);
        assert_eq!(live_inventory.removal_calls().len(), 1);
    }

    // ==================== Apply ====================

    #[tokio::test]
    async fn test_apply_removes_only_redundant_grants() {
        let inventory = InventoryFactory::datacenter();
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["Datacenters"], false).await.unwrap();

        report.assert_clean();
        report.assert_all(RemovalAction::Removed);
        assert_eq!(
            inventory.removal_calls(),
            vec![RemovalCall {
                entity_id: "vm-10".to_string(),
                principal: "alice".to_string(),
                is_group: false,
            }]
        );

        let remaining = inventory.permissions_of("vm-10");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].principal, "carol");
        assert_eq!(inventory.permissions_of("group-v4").len(), 1);
        assert_eq!(inventory.permissions_of("group-d1").len(), 1);
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing() {
        let inventory = InventoryFactory::datacenter();
        let optimizer = optimizer_for(&inventory);

        optimizer.optimize(&["Datacenters"], false).await.unwrap();
        let second = optimizer.optimize(&["Datacenters"], false).await.unwrap();

        assert!(second.is_empty());
        assert_eq!(inventory.removal_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_chain_keeps_only_topmost_grant() {
        let inventory = InventoryFactory::inventory(&InventoryFactory::chain_snapshot(5));
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["e-0"], false).await.unwrap();

        report.assert_redundant(&[
            ("e-1", "ops", "Admin"),
            ("e-2", "ops", "Admin"),
            ("e-3", "ops", "Admin"),
            ("e-4", "ops", "Admin"),
        ]);
        assert!(
            report
                .entries
                .iter()
                .all(|entry| entry.inherited_from.id == "e-0")
        );
        assert_eq!(inventory.permissions_of("e-0").len(), 1);
        for level in 1..5 {
            assert!(inventory.permissions_of(&format!("e-{}", level)).is_empty());
        }
    }

    // ==================== Roots ====================

    #[tokio::test]
    async fn test_subtree_root_starts_with_empty_context() {
        let inventory = InventoryFactory::datacenter();
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["Datacenters/Prod"], true).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(report.entities_visited, 4);
    }

    #[tokio::test]
    async fn test_roots_are_isolated_from_each_other() {
        let inventory = InventoryFactory::inventory(&InventoryFactory::twin_roots_snapshot());
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["root-a", "root-b"], false).await.unwrap();

        report.assert_redundant(&[("a-1", "ops", "Admin")]);
        assert_eq!(inventory.permissions_of("b-1").len(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_root_aborts_before_any_removal() {
        let inventory = InventoryFactory::datacenter();
        let optimizer = optimizer_for(&inventory);

        let result = optimizer
            .optimize(&["Datacenters", "Datacenters/Missing"], false)
            .await;

        match result {
            Err(OptimizerError::RootResolution { reference, source }) => {
                assert_eq!(reference, "Datacenters/Missing");
                assert!(source.is_not_found());
            }
            other => panic!("expected root resolution error, got {:?}", other),
        }
        assert!(inventory.removal_calls().is_empty());
        assert_eq!(inventory.permissions_of("vm-10").len(), 2);
    }

    // ==================== Partial Failures ====================

    #[tokio::test]
    async fn test_unreadable_subtree_is_skipped() {
        let inventory = InventoryFactory::datacenter();
        inventory.fail_reads_on("group-v3", InventoryError::unauthorized("no read on web"));
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["Datacenters"], false).await.unwrap();

        assert!(report.is_empty());
        assert!(!report.is_clean());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, TraversalErrorKind::SubtreeRead);
        assert_eq!(report.errors[0].entity.id, "group-v3");
        // vm-web is never reached, db still is
        assert_eq!(report.entities_visited, 4);
        assert!(inventory.removal_calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_removal_is_recorded_and_scan_continues() {
        let inventory = InventoryFactory::inventory(&InventoryFactory::chain_snapshot(3));
        inventory.fail_removals_on("e-1", "ops", InventoryError::unauthorized("denied"));
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["e-0"], false).await.unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].action, RemovalAction::RemovalFailed);
        assert!(report.entries[0].error.is_some());
        assert_eq!(report.entries[1].action, RemovalAction::Removed);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, TraversalErrorKind::Removal);
        assert_eq!(report.errors[0].principal.as_deref(), Some("ops"));

        assert_eq!(inventory.permissions_of("e-1").len(), 1);
        assert!(inventory.permissions_of("e-2").is_empty());
    }

    #[tokio::test]
    async fn test_transient_read_failures_are_retried() {
        let inventory = InventoryFactory::datacenter();
        inventory.fail_reads_transiently("datacenter-2", 2);
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["Datacenters"], true).await.unwrap();

        report.assert_clean();
        report.assert_redundant(&[("vm-10", "alice", "Admin")]);
    }

    // ==================== Principals and Propagation ====================

    #[tokio::test]
    async fn test_group_and_user_grants_removed_separately() {
        let inventory = InventoryFactory::inventory(&InventoryFactory::mixed_snapshot());
        let optimizer = optimizer_for(&inventory);

        let report = optimizer.optimize(&["folder-1"], false).await.unwrap();

        report.assert_clean();
        report.assert_redundant(&[
            ("vm-1", "VSPHERE\\admins", "Admin"),
            ("vm-1", "VSPHERE\\admins", "Admin"),
            ("vm-1", "auditor", "ReadOnly"),
        ]);
        let calls = inventory.removal_calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].is_group);
        assert!(!calls[1].is_group);
        assert!(inventory.permissions_of("vm-1").is_empty());
    }

    #[tokio::test]
    async fn test_respect_propagate_keeps_grants_below_non_propagating_ancestor() {
        let inventory = InventoryFactory::inventory(&InventoryFactory::mixed_snapshot());
        let optimizer = optimizer_for(&inventory).with_respect_propagate(true);

        let report = optimizer.optimize(&["folder-1"], true).await.unwrap();

        report.assert_redundant(&[
            ("vm-1", "VSPHERE\\admins", "Admin"),
            ("vm-1", "VSPHERE\\admins", "Admin"),
        ]);
    }

    // ==================== Reporting and Cancellation ====================

    #[tokio::test]
    async fn test_report_serializes_actions() {
        let inventory = InventoryFactory::datacenter();
        let report = optimizer_for(&inventory)
            .optimize(&["Datacenters"], true)
            .await
            .unwrap();

        let json = report.to_json().unwrap();
        assert!(json.contains("\"would-remove\""));
        assert!(json.contains(&report.run_id));

        let table = report.to_string();
        assert!(table.contains("vm-web"));
        assert!(table.contains("5 entities visited"));

        let summary = report.summary();
        assert_eq!(summary.would_remove, 1);
        assert_eq!(summary.removed, 0);
        assert!(report.duration_ms().is_some());
    }

    #[tokio::test]
    async fn test_cancelled_run_visits_nothing() {
        let inventory = InventoryFactory::datacenter();
        let optimizer = optimizer_for(&inventory);
        optimizer.cancellation_handle().cancel();

        let report = optimizer.optimize(&["Datacenters"], false).await.unwrap();

        assert!(report.cancelled);
        assert_eq!(report.entities_visited, 0);
        assert!(inventory.removal_calls().is_empty());
    }
}
