//! Validated binary storage for cached analysis results.
//!
//! Serialized module records live under `<cache_dir>/analysis/<key>.mods`,
//! where the key is the source file's content hash. Each artifact is a
//! frame: a 4-byte little-endian header length, a bincode-encoded header
//! with magic bytes, format version, and payload checksum, then the
//! payload itself. A frame that fails any header check reads back as a
//! cache miss.

use std::path::{Path, PathBuf};

use rtlscope_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Subdirectory of the cache holding analysis artifacts.
const ARTIFACT_DIR: &str = "analysis";

/// File extension for analysis artifacts.
const ARTIFACT_EXT: &str = "mods";

/// Magic bytes identifying a cache artifact.
const ARTIFACT_MAGIC: [u8; 4] = *b"RTLS";

/// Current artifact format version. Increment on breaking changes to
/// the header or payload format.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Header prepended to every cached artifact for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Magic bytes: must be `b"RTLS"`.
    pub magic: [u8; 4],

    /// Artifact format version.
    pub format_version: u32,

    /// Tool version that produced this artifact.
    pub tool_version: String,

    /// Content hash of the payload data.
    pub checksum: ContentHash,
}

impl ArtifactHeader {
    fn for_payload(payload: &[u8], tool_version: &str) -> Self {
        Self {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            tool_version: tool_version.to_string(),
            checksum: ContentHash::from_bytes(payload),
        }
    }

    fn validates(&self, payload: &[u8]) -> bool {
        self.magic == ARTIFACT_MAGIC
            && self.format_version == ARTIFACT_FORMAT_VERSION
            && self.checksum == ContentHash::from_bytes(payload)
    }
}

/// Encodes a header and payload into the on-disk frame layout.
fn frame(header: &ArtifactHeader, payload: &[u8]) -> Result<Vec<u8>, CacheError> {
    let header_bytes = bincode::serde::encode_to_vec(header, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

    let mut out = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    out.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Splits a raw frame into its header and payload.
///
/// Returns `None` for anything malformed: a truncated length prefix, a
/// header length past the end of the frame, or an undecodable header.
fn unframe(raw: &[u8]) -> Option<(ArtifactHeader, &[u8])> {
    let len_bytes: [u8; 4] = raw.get(..4)?.try_into().ok()?;
    let header_end = 4usize.checked_add(u32::from_le_bytes(len_bytes) as usize)?;
    let header_bytes = raw.get(4..header_end)?;

    let header: ArtifactHeader =
        bincode::serde::decode_from_slice(header_bytes, bincode::config::standard())
            .ok()?
            .0;
    Some((header, &raw[header_end..]))
}

/// On-disk store for analysis artifacts, keyed by source content hash.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at the given cache directory.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            dir: cache_dir.join(ARTIFACT_DIR),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{ARTIFACT_EXT}"))
    }

    /// Writes a framed artifact and returns its key.
    pub fn write(
        &self,
        source_hash: &ContentHash,
        payload: &[u8],
        tool_version: &str,
    ) -> Result<String, CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let key = source_hash.to_string();
        let path = self.path_for(&key);
        let bytes = frame(&ArtifactHeader::for_payload(payload, tool_version), payload)?;
        std::fs::write(&path, bytes).map_err(|e| CacheError::Io { path, source: e })?;
        Ok(key)
    }

    /// Reads an artifact, validating its header.
    ///
    /// Returns `None` if the file does not exist, the frame is malformed,
    /// the format version does not match, or the checksum fails to verify.
    pub fn read(&self, key: &str) -> Option<Vec<u8>> {
        let raw = std::fs::read(self.path_for(key)).ok()?;
        let (header, payload) = unframe(&raw)?;
        header.validates(payload).then(|| payload.to_vec())
    }
}
