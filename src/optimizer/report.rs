//! Run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{Ambiguity, RemovalAction, ReportEntry, ReportSummary, TraversalError};
use crate::utils::error::Result;
use crate::utils::{format_duration, truncate_string};

/// Result of one optimizer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub run_id: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub entities_visited: usize,
    /// Set when the run stopped early on cancellation
    pub cancelled: bool,
    /// Redundant permissions, in traversal order
    pub entries: Vec<ReportEntry>,
    pub errors: Vec<TraversalError>,
    pub ambiguities: Vec<Ambiguity>,
}

impl OptimizeReport {
    pub fn new(run_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            run_id: run_id.into(),
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            entities_visited: 0,
            cancelled: false,
            entries: Vec::new(),
            errors: Vec::new(),
            ambiguities: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// No recorded errors and not cancelled
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.cancelled
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.finished_at.map(|finished| {
            (finished - self.started_at)
                .num_milliseconds()
                .max(0) as u64
        })
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |action: RemovalAction| self.entries_with(action).count();

        ReportSummary {
            entities_visited: self.entities_visited,
            redundant: self.entries.len(),
            removed: count(RemovalAction::Removed),
            would_remove: count(RemovalAction::WouldRemove),
            failed: count(RemovalAction::RemovalFailed),
            skipped: count(RemovalAction::Skipped),
            errors: self.errors.len(),
            ambiguities: self.ambiguities.len(),
        }
    }

    /// (entity id, principal, role) of every entry, ignoring the action
    pub fn redundant_keys(&self) -> Vec<(String, String, String)> {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.entity.id.clone(),
                    entry.principal.clone(),
                    entry.role.clone(),
                )
            })
            .collect()
    }

    pub fn entries_with(&self, action: RemovalAction) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |entry| entry.action == action)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl fmt::Display for OptimizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<15} {:<40} {:<24} {:<16} {}",
            "ACTION", "ENTITY", "PRINCIPAL", "ROLE", "INHERITED FROM"
        )?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<15} {:<40} {:<24} {:<16} {}",
                entry.action,
                truncate_string(&entry.path, 40),
                truncate_string(&entry.principal, 24),
                truncate_string(&entry.role, 16),
                entry.inherited_from.name
            )?;
        }

        for error in &self.errors {
            writeln!(f, "error: {} [{:?}]: {}", error.path, error.kind, error.message)?;
        }
        for ambiguity in &self.ambiguities {
            writeln!(
                f,
                "ambiguous: {} {}/{}: {}",
                ambiguity.path, ambiguity.principal, ambiguity.role, ambiguity.detail
            )?;
        }

        let summary = self.summary();
        write!(
            f,
            "{} entities visited, {} redundant ({} removed, {} would-remove, {} failed, {} skipped), {} errors",
            summary.entities_visited,
            summary.redundant,
            summary.removed,
            summary.would_remove,
            summary.failed,
            summary.skipped,
            summary.errors
        )?;
        if let Some(ms) = self.duration_ms() {
            write!(f, " in {}", format_duration(ms))?;
        }
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}
