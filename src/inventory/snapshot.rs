//! Serializable inventory snapshots
//!
//! A snapshot is a nested tree of entities with their directly assigned
//! permissions, exported from the platform and loaded from YAML or JSON.

use crate::config::models::default_true;
use crate::utils::error::{OptimizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Root of a snapshot file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Top-level entities, in platform order
    #[serde(default)]
    pub entities: Vec<EntityNode>,
}

/// One entity and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<GrantSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityNode>,
}

/// A permission as written in a snapshot; the owning entity is implied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantSpec {
    pub principal: String,
    pub role: String,
    #[serde(default = "default_true")]
    pub propagate: bool,
    #[serde(default, rename = "group")]
    pub is_group: bool,
}

/// Snapshot file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Pick the format from a file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl EntityNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn grant(mut self, principal: impl Into<String>, role: impl Into<String>) -> Self {
        self.permissions.push(GrantSpec {
            principal: principal.into(),
            role: role.into(),
            propagate: true,
            is_group: false,
        });
        self
    }

    pub fn with_grant(mut self, grant: GrantSpec) -> Self {
        self.permissions.push(grant);
        self
    }

    pub fn child(mut self, child: EntityNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of entities in this subtree, this one included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(EntityNode::count).sum::<usize>()
    }
}

impl InventorySnapshot {
    pub fn new(entities: Vec<EntityNode>) -> Self {
        Self { entities }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a snapshot, choosing the decoder from the file extension
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading inventory snapshot from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            OptimizerError::snapshot(format!("Failed to read snapshot {:?}: {}", path, e))
        })?;

        let snapshot = match SnapshotFormat::from_path(path) {
            SnapshotFormat::Json => Self::from_json_str(&content)?,
            SnapshotFormat::Yaml => Self::from_yaml_str(&content)?,
        };

        debug!("Loaded snapshot with {} entities", snapshot.entity_count());
        Ok(snapshot)
    }

    /// Write the snapshot, choosing the encoder from the file extension
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match SnapshotFormat::from_path(path) {
            SnapshotFormat::Json => serde_json::to_string_pretty(self)?,
            SnapshotFormat::Yaml => serde_yaml::to_string(self)?,
        };

        tokio::fs::write(path, content).await?;
        info!("Saved inventory snapshot to: {:?}", path);
        Ok(())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.iter().map(EntityNode::count).sum()
    }

    /// Total number of directly assigned permissions
    pub fn permission_count(&self) -> usize {
        fn count(node: &EntityNode) -> usize {
            node.permissions.len() + node.children.iter().map(count).sum::<usize>()
        }
        self.entities.iter().map(count).sum()
    }
}
