//! Structural extraction of hardware modules from decoded CST dumps.
//!
//! The pipeline is: decode the dump into a [`SyntaxTree`](rtlscope_cst::SyntaxTree),
//! walk it by tag to produce one [`Module`] record per module declaration,
//! then classify every provisional register as a flip-flop or latch. The
//! main entry point is [`analyze_dump`].
//!
//! Extraction is a structural index, not elaboration: no expression
//! evaluation, no parameter resolution, no multi-file linking, no type
//! checking.

#![warn(missing_docs)]

pub mod classify;
pub mod extract;
pub mod model;

pub use classify::classify_module;
pub use extract::extract;
pub use model::{
    AssignTarget, BlockKind, Instance, Module, NetType, Parameter, Port, PortDirection,
    ProceduralBlock, Register, RegisterKind, Signal,
};

use rtlscope_cst::DecodeError;
use rtlscope_diagnostics::DiagnosticSink;
use rtlscope_source::SourceFile;

/// Decodes a CST dump, extracts all modules, and classifies registers.
///
/// `file` must hold the source text the dump was generated from; leaf byte
/// offsets are translated to line numbers against it. Anomalies in the
/// dump or the declarations are reported to `sink` and degraded; the only
/// hard failure is a dump with no root node.
pub fn analyze_dump(
    dump: &str,
    file: &SourceFile,
    sink: &DiagnosticSink,
) -> Result<Vec<Module>, DecodeError> {
    let tree = rtlscope_cst::decode(dump, sink)?;
    let mut modules = extract(&tree, file, sink);
    for module in &mut modules {
        classify_module(module);
    }
    Ok(modules)
}
