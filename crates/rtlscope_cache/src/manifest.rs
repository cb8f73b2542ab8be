//! Cache manifest tracking per-file analysis state.
//!
//! The manifest is stored as `manifest.json` in the cache directory. It
//! records a content hash for every analyzed source file, so unchanged
//! files can be recognized without re-decoding their dumps.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rtlscope_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Name of the manifest file within the cache directory.
const MANIFEST_FILE: &str = "manifest.json";

/// Top-level cache manifest tracking all analyzed source files.
///
/// Serialized as `manifest.json` in the cache directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Tool version that produced this cache. Invalidate on version change.
    pub tool_version: String,

    /// Per-source-file cache state, keyed by path relative to project root.
    pub files: HashMap<PathBuf, FileCache>,
}

/// Cached state for a single source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCache {
    /// Content hash of the source file when it was last analyzed.
    pub content_hash: ContentHash,

    /// Key in the `analysis/` artifact directory for the cached module records.
    pub analysis_key: String,

    /// Module names extracted from this file.
    pub modules_defined: Vec<String>,
}

impl CacheManifest {
    /// Creates a new, empty cache manifest for the given tool version.
    pub fn new(tool_version: &str) -> Self {
        Self {
            tool_version: tool_version.to_string(),
            files: HashMap::new(),
        }
    }

    /// Loads the manifest from the cache directory, returning `None` if
    /// the file doesn't exist or can't be parsed.
    ///
    /// This is fail-safe: any error results in `None` (cache miss),
    /// triggering a full re-analysis.
    pub fn load(cache_dir: &Path) -> Option<Self> {
        let path = cache_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the manifest to the cache directory.
    ///
    /// Creates the cache directory if it doesn't exist.
    pub fn save(&self, cache_dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(cache_dir).map_err(|e| CacheError::Io {
            path: cache_dir.to_path_buf(),
            source: e,
        })?;
        let path = cache_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }

    /// Returns `true` if this manifest was produced by a compatible tool version.
    pub fn is_compatible(&self, current_version: &str) -> bool {
        self.tool_version == current_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_manifest_is_empty() {
        let m = CacheManifest::new("0.1.0");
        assert_eq!(m.tool_version, "0.1.0");
        assert!(m.files.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = CacheManifest::new("0.1.0");
        m.files.insert(
            PathBuf::from("src/top.v"),
            FileCache {
                content_hash: ContentHash::from_bytes(b"top.v content"),
                analysis_key: "abc123".to_string(),
                modules_defined: vec!["top".to_string()],
            },
        );
        m.save(dir.path()).unwrap();

        let loaded = CacheManifest::load(dir.path()).unwrap();
        assert_eq!(loaded.tool_version, "0.1.0");
        assert_eq!(loaded.files.len(), 1);
        let fc = &loaded.files[&PathBuf::from("src/top.v")];
        assert_eq!(fc.analysis_key, "abc123");
        assert_eq!(fc.modules_defined, vec!["top"]);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CacheManifest::load(dir.path()).is_none());
    }

    #[test]
    fn load_corrupt_json_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.json"), "not valid json {{{").unwrap();
        assert!(CacheManifest::load(dir.path()).is_none());
    }

    #[test]
    fn is_compatible_same_version() {
        let m = CacheManifest::new("0.1.0");
        assert!(m.is_compatible("0.1.0"));
    }

    #[test]
    fn is_compatible_different_version() {
        let m = CacheManifest::new("0.1.0");
        assert!(!m.is_compatible("0.2.0"));
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeply").join("nested").join("cache");
        let m = CacheManifest::new("0.1.0");
        m.save(&nested).unwrap();
        assert!(nested.join("manifest.json").exists());
    }
}
