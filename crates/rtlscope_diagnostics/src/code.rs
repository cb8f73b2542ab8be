//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Warning diagnostics, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric
/// identifier, displayed as e.g. `W301`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Well-known codes emitted by the decode and extraction stages.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// A dump line matched neither the node nor the leaf grammar and was skipped.
    pub const SKIPPED_DUMP_LINE: DiagnosticCode = DiagnosticCode {
        category: Category::Warning,
        number: 301,
    };

    /// A declaration was missing an expected child; defaults were substituted.
    pub const DEGRADED_DECLARATION: DiagnosticCode = DiagnosticCode {
        category: Category::Warning,
        number: 302,
    };

    /// The dump contained no valid root node line.
    pub const NO_ROOT_NODE: DiagnosticCode = DiagnosticCode {
        category: Category::Error,
        number: 101,
    };
}
