//! Structured diagnostics for decode and extraction anomalies.
//!
//! No anomaly in the dump or the source text aborts an analysis; the
//! decoder and extractor degrade to safe defaults and record what they
//! skipped or defaulted here. Hosts inspect the [`DiagnosticSink`] after
//! an analysis to surface dump corruption or unsupported declaration
//! shapes to the user.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
