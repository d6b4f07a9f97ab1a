//! Manifest produced by the export sandbox, and the snapshot saved between runs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::DesignNode;
use crate::{CompileError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_nodes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_images: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One extraction run's output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub root: Option<DesignNode>,
    #[serde(default)]
    pub unresolved_content_hashes: Vec<String>,
    /// Base64-encoded raster bytes keyed by content hash.
    #[serde(default)]
    pub raw_content_by_hash: HashMap<String, String>,
    #[serde(default)]
    pub stats: ManifestStats,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CompileError::Config(format!(
                "Failed to read manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&contents)
    }

    /// Take the root out of the manifest; a manifest without one is fatal.
    pub fn take_root(&mut self) -> Result<DesignNode> {
        self.root
            .take()
            .ok_or_else(|| CompileError::malformed("manifest has no root node"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub name: String,
    pub structural_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    pub width: f64,
    pub height: f64,
}

/// Fingerprints of the previous export, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub entries: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Load a snapshot; a missing file means there is no previous export.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CompileError::Io(e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        crate::fsutil::write_atomic(path, json.as_bytes())
    }
}
