//! Source file representation with line-start indexing for fast line lookup.

use crate::file_id::FileId;
use rtlscope_common::ContentHash;
use std::path::PathBuf;

/// A source file loaded into the analysis session.
///
/// Stores the file's content along with precomputed line-start offsets.
/// The structural extractor uses [`line_of`](Self::line_of) to translate
/// CST leaf byte offsets into 1-indexed line numbers.
pub struct SourceFile {
    /// The unique identifier for this file within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Hash of the file content, used as the cache key.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts and content hash.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            id,
            path,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into a 1-indexed line number.
    ///
    /// Uses binary search on the precomputed line-start offsets. Offsets
    /// past the end of the file map to the last line.
    pub fn line_of(&self, byte_offset: u32) -> u32 {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        (line_idx as u32) + 1
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line = self.line_of(byte_offset);
        let col = byte_offset - self.line_starts[(line - 1) as usize] + 1;
        (line, col)
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
