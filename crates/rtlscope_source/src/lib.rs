//! Source file management and byte-offset-to-line translation.
//!
//! This crate provides the [`SourceDb`] for loading and managing source
//! files, [`FileId`] and [`Span`] types for tracking source locations, and
//! the line-start index used to map CST leaf offsets to line numbers.

#![warn(missing_docs)]

pub mod file_id;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
