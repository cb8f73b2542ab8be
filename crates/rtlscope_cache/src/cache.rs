//! High-level cache orchestrator.
//!
//! The `Cache` type ties the manifest, artifact store, and change
//! detection into a single interface for the analysis pipeline: partition
//! the source set against the manifest, load cached records for unchanged
//! files, store records for re-analyzed ones, and prune entries for files
//! that left the source set.

use std::path::{Path, PathBuf};

use rtlscope_common::ContentHash;
use rtlscope_extract::Module;

use crate::artifact::ArtifactStore;
use crate::changes::{self, ChangeSet};
use crate::error::CacheError;
use crate::manifest::{CacheManifest, FileCache};

/// High-level cache manager for incremental analysis.
///
/// All reads are fail-safe: corruption or version mismatches result in
/// cache misses rather than errors.
pub struct Cache {
    cache_dir: PathBuf,
    manifest: CacheManifest,
    store: ArtifactStore,
    tool_version: String,
}

impl Cache {
    /// Loads an existing cache or creates a fresh one.
    ///
    /// If a manifest exists and is compatible with the current tool
    /// version, it is loaded. Otherwise a new empty manifest is created.
    /// This is fail-safe: any problem with the existing cache results in
    /// starting fresh.
    pub fn load_or_create(cache_dir: &Path, tool_version: &str) -> Self {
        let manifest = CacheManifest::load(cache_dir)
            .filter(|m| m.is_compatible(tool_version))
            .unwrap_or_else(|| CacheManifest::new(tool_version));

        Self {
            cache_dir: cache_dir.to_path_buf(),
            manifest,
            store: ArtifactStore::new(cache_dir),
            tool_version: tool_version.to_string(),
        }
    }

    /// Partitions the current source set against the manifest.
    pub fn detect_changes(&self, paths: &[PathBuf]) -> Result<ChangeSet, CacheError> {
        changes::detect_changes(paths, &self.manifest)
    }

    /// Stores the extracted module records for a source file.
    ///
    /// The records are serialized and written to the artifact store; the
    /// manifest records the content hash, cache key, and module names.
    pub fn store_modules(
        &mut self,
        path: &Path,
        content_hash: ContentHash,
        modules: &[Module],
    ) -> Result<String, CacheError> {
        let bytes = bincode::serde::encode_to_vec(modules, bincode::config::standard()).map_err(
            |e| CacheError::Serialization {
                reason: e.to_string(),
            },
        )?;

        let key = self
            .store
            .write(&content_hash, &bytes, &self.tool_version)?;

        self.manifest.files.insert(
            path.to_path_buf(),
            FileCache {
                content_hash,
                analysis_key: key.clone(),
                modules_defined: modules.iter().map(|m| m.name.clone()).collect(),
            },
        );

        Ok(key)
    }

    /// Loads the cached module records for a source file.
    ///
    /// Returns `None` if the file is not in the manifest, the artifact is
    /// missing, or validation or deserialization fails. This is fail-safe.
    pub fn load_modules(&self, path: &Path) -> Option<Vec<Module>> {
        let fc = self.manifest.files.get(path)?;
        let bytes = self.store.read(&fc.analysis_key)?;
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .ok()
            .map(|(modules, _)| modules)
    }

    /// Removes manifest entries for files no longer in the source set.
    pub fn remove_deleted(&mut self, deleted_paths: &[PathBuf]) {
        for path in deleted_paths {
            self.manifest.files.remove(path);
        }
    }

    /// Persists the current manifest to disk.
    pub fn save(&self) -> Result<(), CacheError> {
        self.manifest.save(&self.cache_dir)
    }

    /// Returns a reference to the current cache manifest.
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }
}
