//! Incremental analysis cache.
//!
//! This crate provides content-hash-based caching for extracted module
//! records, so repeated analysis runs skip decode and extraction for
//! source files that have not changed.

#![warn(missing_docs)]

pub mod artifact;
pub mod cache;
pub mod changes;
pub mod error;
pub mod manifest;

pub use artifact::{ArtifactHeader, ArtifactStore};
pub use cache::Cache;
pub use changes::{detect_changes, hash_file, ChangeSet};
pub use error::CacheError;
pub use manifest::{CacheManifest, FileCache};
