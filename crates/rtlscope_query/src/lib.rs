//! Structural queries over a corpus of extracted modules.
//!
//! The [`CorpusStore`] accumulates extraction results file by file and
//! hands out immutable [`Corpus`] snapshots; the query functions in
//! [`engine`] are pure over a snapshot, so concurrent readers never see a
//! partially-updated corpus while files are being (re)inserted.

#![warn(missing_docs)]

pub mod corpus;
pub mod engine;
pub mod error;

pub use corpus::{Corpus, CorpusStore};
pub use engine::{
    analyze_module, project_stats, query_registers, trace_signal, HierarchyReport, KindFilter,
    ModuleFacet, ModuleReport, ProjectStats, RegisterHit, TraceHit, TraceRole,
};
pub use error::QueryError;
