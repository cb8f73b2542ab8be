//! Structured diagnostic messages with severity, codes, and spans.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use rtlscope_source::Span;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message with an optional source location.
///
/// Diagnostics produced during decoding carry the dump line number in
/// `notes` rather than a span, since the dump is not a loaded source file.
/// Diagnostics produced during extraction carry a span into the source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The primary source span where the issue was detected.
    pub primary_span: Span,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code, message, and span.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            primary_span: span,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic with the given code, message, and span.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            primary_span: span,
            notes: Vec::new(),
        }
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::codes;

    #[test]
    fn error_construction() {
        let d = Diagnostic::error(codes::NO_ROOT_NODE, "no root node in dump", Span::DUMMY);
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "no root node in dump");
    }

    #[test]
    fn warning_with_note() {
        let d = Diagnostic::warning(codes::SKIPPED_DUMP_LINE, "skipped line", Span::DUMMY)
            .with_note("dump line 17");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.notes, vec!["dump line 17"]);
    }

    #[test]
    fn serde_roundtrip() {
        let d = Diagnostic::warning(codes::DEGRADED_DECLARATION, "defaulted width", Span::DUMMY);
        let json = serde_json::to_string(&d).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, d.message);
        assert_eq!(back.code, d.code);
    }
}
