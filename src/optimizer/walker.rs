//! Depth-first traversal
//!
//! Frames are processed from an explicit stack. Each frame owns an
//! `Arc` to the context inherited from its parent; a parent's surviving
//! grants are added to a fresh copy shared only by its own children.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::context::{EffectivePermissionSet, GrantSource};
use super::report::OptimizeReport;
use super::system::PermissionOptimizer;
use super::types::{Ambiguity, RemovalAction, ReportEntry, TraversalError};
use crate::inventory::{EntityRef, InventoryError, Permission, PermissionKey};

struct Frame {
    entity: EntityRef,
    path: String,
    inherited: Arc<EffectivePermissionSet>,
}

/// Split of one entity's permissions against its inherited context
struct Classification<'a> {
    /// Grants already held by an ancestor, with the ancestor's source
    redundant: Vec<(&'a Permission, &'a GrantSource)>,
    /// Grants that stay; the first copy per key only
    survivors: Vec<&'a Permission>,
}

impl PermissionOptimizer {
    /// Walk one root; returns false when the run was cancelled
    pub(super) async fn walk(
        &self,
        root: &EntityRef,
        dry_run: bool,
        report: &mut OptimizeReport,
    ) -> bool {
        let mut stack = vec![Frame {
            entity: root.clone(),
            path: root.name.clone(),
            inherited: Arc::new(EffectivePermissionSet::new()),
        }];

        while let Some(frame) = stack.pop() {
            if self.cancellation.is_cancelled() {
                warn!(entity = %frame.entity.id, "Scan cancelled");
                report.cancelled = true;
                return false;
            }

            report.entities_visited += 1;

            let (permissions, children) = match self.read_entity(&frame.entity).await {
                Ok(read) => read,
                Err(error) => {
                    warn!(
                        entity = %frame.entity.id,
                        path = %frame.path,
                        %error,
                        "Failed to read entity, skipping subtree"
                    );
                    report
                        .errors
                        .push(TraversalError::subtree_read(&frame.entity, &frame.path, &error));
                    continue;
                }
            };

            let classification = classify(&frame, &permissions, report);
            self.settle(&frame, &classification, dry_run, report).await;

            let inherited = self.child_context(&frame, &classification.survivors);
            for child in children.into_iter().rev() {
                let path = format!("{}/{}", frame.path, child.name);
                stack.push(Frame {
                    entity: child,
                    path,
                    inherited: Arc::clone(&inherited),
                });
            }
        }

        true
    }

    async fn read_entity(
        &self,
        entity: &EntityRef,
    ) -> Result<(Vec<Permission>, Vec<EntityRef>), InventoryError> {
        let permissions = self
            .retry
            .call_if(
                "permissions",
                || self.reader.permissions(entity),
                InventoryError::is_retryable,
            )
            .await?;

        let children = self
            .retry
            .call_if(
                "children",
                || self.reader.children(entity),
                InventoryError::is_retryable,
            )
            .await?;

        Ok((permissions, children))
    }

    /// Record every redundant grant of one entity and revoke it unless dry run
    ///
    /// The mutator revokes by principal, so each (principal, kind) is removed
    /// at most once per entity, and never when the same principal also holds
    /// a surviving grant there.
    async fn settle(
        &self,
        frame: &Frame,
        classification: &Classification<'_>,
        dry_run: bool,
        report: &mut OptimizeReport,
    ) {
        let protected: HashSet<(&str, bool)> = classification
            .survivors
            .iter()
            .map(|permission| (permission.principal.as_str(), permission.is_group))
            .collect();

        let mut outcomes: HashMap<(&str, bool), (RemovalAction, Option<String>)> = HashMap::new();

        for (permission, _) in &classification.redundant {
            let who = (permission.principal.as_str(), permission.is_group);
            if outcomes.contains_key(&who) {
                continue;
            }

            let outcome = if protected.contains(&who) {
                warn!(
                    entity = %frame.entity.id,
                    principal = %permission.principal,
                    "Principal holds another grant on this entity, leaving redundant grant in place"
                );
                (RemovalAction::Skipped, None)
            } else if dry_run {
                (RemovalAction::WouldRemove, None)
            } else {
                match self.remove(&frame.entity, permission).await {
                    Ok(()) => (RemovalAction::Removed, None),
                    Err(error) => {
                        warn!(
                            entity = %frame.entity.id,
                            principal = %permission.principal,
                            %error,
                            "Failed to remove redundant permission"
                        );
                        report.errors.push(TraversalError::removal(
                            &frame.entity,
                            &frame.path,
                            &permission.principal,
                            &error,
                        ));
                        (RemovalAction::RemovalFailed, Some(error.to_string()))
                    }
                }
            };
            outcomes.insert(who, outcome);
        }

        for (permission, source) in &classification.redundant {
            let who = (permission.principal.as_str(), permission.is_group);
            let (action, error) = outcomes
                .get(&who)
                .cloned()
                .unwrap_or((RemovalAction::Skipped, None));

            info!(
                entity = %frame.entity.id,
                path = %frame.path,
                principal = %permission.principal,
                role = %permission.role,
                inherited_from = %source.entity.id,
                %action,
                "Redundant permission"
            );

            report.entries.push(ReportEntry {
                entity: frame.entity.clone(),
                path: frame.path.clone(),
                principal: permission.principal.clone(),
                role: permission.role.clone(),
                is_group: permission.is_group,
                propagate: permission.propagate,
                action,
                inherited_from: source.entity.clone(),
                error,
            });
        }
    }

    async fn remove(&self, entity: &EntityRef, permission: &Permission) -> Result<(), InventoryError> {
        let result = self
            .retry
            .call_if(
                "remove_permission",
                || {
                    self.mutator
                        .remove_permission(entity, &permission.principal, permission.is_group)
                },
                InventoryError::is_retryable,
            )
            .await;

        match result {
            Err(error) if error.is_not_found() => {
                debug!(
                    entity = %entity.id,
                    principal = %permission.principal,
                    "Grant already absent, treating removal as done"
                );
                Ok(())
            }
            other => other,
        }
    }

    fn child_context(
        &self,
        frame: &Frame,
        survivors: &[&Permission],
    ) -> Arc<EffectivePermissionSet> {
        let inheritable: Vec<&Permission> = survivors
            .iter()
            .copied()
            .filter(|permission| !self.respect_propagate || permission.propagate)
            .collect();

        if inheritable.is_empty() {
            Arc::clone(&frame.inherited)
        } else {
            Arc::new(frame.inherited.extended(&frame.entity, inheritable))
        }
    }
}

fn classify<'a>(
    frame: &'a Frame,
    permissions: &'a [Permission],
    report: &mut OptimizeReport,
) -> Classification<'a> {
    let mut redundant = Vec::new();
    let mut survivors: Vec<&Permission> = Vec::new();
    let mut seen: HashMap<PermissionKey, &Permission> = HashMap::new();

    for permission in permissions {
        let key = permission.key();

        if let Some(source) = frame.inherited.get(&key) {
            redundant.push((permission, source));
            continue;
        }

        match seen.get(&key) {
            Some(first) => {
                if first.propagate != permission.propagate {
                    warn!(
                        entity = %frame.entity.id,
                        %key,
                        "Same principal and role assigned twice with different propagate flags"
                    );
                    report.ambiguities.push(Ambiguity {
                        entity: frame.entity.clone(),
                        path: frame.path.clone(),
                        principal: permission.principal.clone(),
                        role: permission.role.clone(),
                        detail: "assigned twice with different propagate flags".to_string(),
                    });
                }
            }
            None => {
                seen.insert(key, permission);
                survivors.push(permission);
            }
        }
    }

    Classification {
        redundant,
        survivors,
    }
}
