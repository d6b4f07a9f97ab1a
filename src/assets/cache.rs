//! Persistent content-hash → asset id cache.
//!
//! Entries are immutable: a hash never changes meaning, so an existing entry
//! is never overwritten. The file is rewritten after every insert so a crash
//! mid-run loses at most the upload in flight.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fsutil::write_atomic;
use crate::{CompileError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub asset_id: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    entries: BTreeMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    path: Option<PathBuf>,
    file: CacheFile,
}

impl AssetCache {
    /// A cache that lives only for this process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read the cache file once; a missing file starts an empty cache there.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CompileError::Config(format!(
                    "Failed to parse asset cache {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(e) => return Err(CompileError::Io(e)),
        };
        tracing::debug!(path = %path.display(), entries = file.entries.len(), "loaded asset cache");
        Ok(Self {
            path: Some(path.to_path_buf()),
            file,
        })
    }

    pub fn get(&self, hash: &str) -> Option<&CacheEntry> {
        self.file.entries.get(hash)
    }

    pub fn asset_id(&self, hash: &str) -> Option<&str> {
        self.get(hash).map(|e| e.asset_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    /// Record a fresh upload and persist. Existing entries are kept as-is.
    pub fn insert(&mut self, hash: &str, asset_id: &str) -> Result<&CacheEntry> {
        if !self.file.entries.contains_key(hash) {
            self.file.entries.insert(
                hash.to_string(),
                CacheEntry {
                    asset_id: asset_id.to_string(),
                    uploaded_at: Utc::now(),
                },
            );
            self.persist()?;
        }
        self.file
            .entries
            .get(hash)
            .ok_or_else(|| CompileError::Config(format!("cache entry for {hash} vanished")))
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.file)?;
        write_atomic(path, json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().expect("tempdir");
        let cache = AssetCache::load(&dir.path().join("cache.json")).expect("load");
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_persists_and_reloads() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cache.json");
        let mut cache = AssetCache::load(&path).expect("load");
        cache.insert("h1", "1001").expect("insert");

        let reloaded = AssetCache::load(&path).expect("reload");
        assert_eq!(reloaded.asset_id("h1"), Some("1001"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(raw["entries"]["h1"]["assetId"], "1001");
        assert!(raw["entries"]["h1"]["uploadedAt"].is_string());
    }

    #[test]
    fn entries_are_never_overwritten() {
        let mut cache = AssetCache::in_memory();
        let first = cache.insert("h1", "1001").expect("insert").clone();
        let second = cache.insert("h1", "2002").expect("insert").clone();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn corrupt_cache_is_a_config_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").expect("write");
        let err = AssetCache::load(&path).unwrap_err();
        assert!(matches!(err, CompileError::Config(msg) if msg.contains("asset cache")));
    }
}
