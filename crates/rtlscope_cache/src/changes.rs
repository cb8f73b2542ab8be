//! Change detection against the cache manifest.
//!
//! Each source file in the current set is hashed and compared to its
//! manifest entry from the previous run. Hash-equal files can be served
//! from the cache; the rest need analysis. Manifest entries whose file is
//! no longer in the source set are reported so the caller can prune them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rtlscope_common::ContentHash;

use crate::error::CacheError;
use crate::manifest::CacheManifest;

/// Partition of the current source set against the manifest.
///
/// Each bucket is sorted by path so parallel analysis and log output
/// stay deterministic. Dirty and unchanged entries carry the file's
/// current content hash, so a caller that falls back from a cache hit to
/// re-analysis does not hash the file twice.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Files that need analysis: absent from the manifest, or hash-changed.
    pub dirty: Vec<(PathBuf, ContentHash)>,

    /// Files whose content hash matches their manifest entry.
    pub unchanged: Vec<(PathBuf, ContentHash)>,

    /// Manifest entries with no file in the current source set.
    pub deleted: Vec<PathBuf>,
}

impl ChangeSet {
    /// Builds a change set that marks every file dirty.
    ///
    /// Used when caching is disabled and there is no manifest to compare
    /// against.
    pub fn all_dirty(paths: &[PathBuf]) -> Result<Self, CacheError> {
        let mut dirty = Vec::with_capacity(paths.len());
        for path in paths {
            dirty.push((path.clone(), hash_file(path)?));
        }
        dirty.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self {
            dirty,
            ..Self::default()
        })
    }

    /// Returns `true` if nothing needs analysis and nothing was deleted.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty() && self.deleted.is_empty()
    }
}

/// Reads a file and returns its XXH3-128 content hash.
pub fn hash_file(path: &Path) -> Result<ContentHash, CacheError> {
    let content = std::fs::read(path).map_err(|e| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(ContentHash::from_bytes(&content))
}

/// Partitions `paths` against the manifest.
///
/// An unreadable file is an error here, not a deletion: the caller named
/// it as part of the current source set, so the run cannot decide whether
/// it changed.
pub fn detect_changes(
    paths: &[PathBuf],
    manifest: &CacheManifest,
) -> Result<ChangeSet, CacheError> {
    let mut set = ChangeSet::default();
    for path in paths {
        let hash = hash_file(path)?;
        match manifest.files.get(path) {
            Some(fc) if fc.content_hash == hash => set.unchanged.push((path.clone(), hash)),
            _ => set.dirty.push((path.clone(), hash)),
        }
    }

    let current: HashSet<&PathBuf> = paths.iter().collect();
    set.deleted = manifest
        .files
        .keys()
        .filter(|p| !current.contains(p))
        .cloned()
        .collect();

    set.dirty.sort_by(|a, b| a.0.cmp(&b.0));
    set.unchanged.sort_by(|a, b| a.0.cmp(&b.0));
    set.deleted.sort();
    Ok(set)
}
