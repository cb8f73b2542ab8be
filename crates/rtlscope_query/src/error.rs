//! Error types for query operations.
//!
//! Only lookups that name an entity the caller expected to exist fail
//! hard. Signal traces return empty lists instead of errors, to support
//! exploratory queries over unfamiliar designs.

/// A query-level failure naming an entity absent from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// `analyze_module` was asked about a module the corpus does not contain.
    #[error("module `{0}` not found in the corpus")]
    ModuleNotFound(String),

    /// A register query was scoped to a module the corpus does not contain.
    #[error("scope `{0}` does not name a module in the corpus")]
    InvalidScope(String),
}
