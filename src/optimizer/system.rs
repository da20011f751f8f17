//! Optimizer entry point

use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};

use super::cancel::CancellationHandle;
use super::report::OptimizeReport;
use crate::config::OptimizerConfig;
use crate::inventory::{EntityRef, InventoryError, InventoryReader, PermissionMutator};
use crate::utils::error::{OptimizerError, Result, RetryConfig, RetryPolicy};
use crate::utils::generate_run_id;

/// Removes permissions already granted by an ancestor on the same path
#[derive(Clone)]
pub struct PermissionOptimizer {
    pub(super) reader: Arc<dyn InventoryReader>,
    pub(super) mutator: Arc<dyn PermissionMutator>,
    pub(super) retry: RetryPolicy,
    /// Only propagating ancestor grants make a descendant grant redundant
    pub(super) respect_propagate: bool,
    pub(super) cancellation: CancellationHandle,
}

impl std::fmt::Debug for PermissionOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionOptimizer")
            .field("retry", &self.retry)
            .field("respect_propagate", &self.respect_propagate)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl PermissionOptimizer {
    /// Create an optimizer with the default retry policy
    pub fn new(reader: Arc<dyn InventoryReader>, mutator: Arc<dyn PermissionMutator>) -> Self {
        Self {
            reader,
            mutator,
            retry: RetryPolicy::default(),
            respect_propagate: false,
            cancellation: CancellationHandle::new(),
        }
    }

    /// Create an optimizer from run configuration
    pub fn from_config(
        reader: Arc<dyn InventoryReader>,
        mutator: Arc<dyn PermissionMutator>,
        config: &OptimizerConfig,
    ) -> Self {
        Self::new(reader, mutator)
            .with_retry(RetryConfig::from(&config.retry))
            .with_respect_propagate(config.respect_propagate)
    }

    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryPolicy::new(config);
        self
    }

    pub fn with_respect_propagate(mut self, respect_propagate: bool) -> Self {
        self.respect_propagate = respect_propagate;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationHandle) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Handle that stops a running scan at the next entity
    pub fn cancellation_handle(&self) -> CancellationHandle {
        self.cancellation.clone()
    }

    /// Scan every root and remove (or, on a dry run, report) redundant grants
    ///
    /// All roots are resolved before anything is read or mutated; a root that
    /// cannot be resolved fails the whole call. Every other failure is
    /// recorded in the returned report.
    pub async fn optimize<S: AsRef<str>>(
        &self,
        roots: &[S],
        dry_run: bool,
    ) -> Result<OptimizeReport> {
        if roots.is_empty() {
            return Err(OptimizerError::validation("At least one root is required"));
        }

        let run_id = generate_run_id();
        let span = info_span!("optimize", run_id = %run_id, dry_run);

        async move {
            info!(
                roots = roots.len(),
                max_attempts = self.retry.config().max_attempts,
                respect_propagate = self.respect_propagate,
                "Starting permission optimization"
            );

            let resolved = self.resolve_roots(roots).await?;
            let mut report = OptimizeReport::new(run_id, dry_run);

            for root in &resolved {
                if !self.walk(root, dry_run, &mut report).await {
                    break;
                }
            }

            report.finish();

            let summary = report.summary();
            info!(
                entities = summary.entities_visited,
                redundant = summary.redundant,
                removed = summary.removed,
                would_remove = summary.would_remove,
                failed = summary.failed,
                skipped = summary.skipped,
                errors = summary.errors,
                cancelled = report.cancelled,
                "Permission optimization finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn resolve_roots<S: AsRef<str>>(&self, roots: &[S]) -> Result<Vec<EntityRef>> {
        let mut resolved = Vec::with_capacity(roots.len());

        for reference in roots {
            let reference = reference.as_ref();
            let entity = self
                .retry
                .call_if(
                    "resolve",
                    || self.reader.resolve(reference),
                    InventoryError::is_retryable,
                )
                .await
                .map_err(|e| OptimizerError::root_resolution(reference, e))?;

            debug!(reference, entity = %entity, "Resolved root");
            resolved.push(entity);
        }

        Ok(resolved)
    }
}
