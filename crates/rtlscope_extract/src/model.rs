//! Structural records extracted from a module declaration.
//!
//! These records form a purely syntactic index: no expression evaluation,
//! no parameter resolution, no type checking. Symbolic widths fall back
//! to 1. All records serialize to plain structured data.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

/// The declared storage type of a port or signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetType {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `logic`
    Logic,
}

impl NetType {
    /// Returns `true` if declarations of this type infer storage
    /// (and therefore produce a provisional [`Register`]).
    pub fn is_storage(self) -> bool {
        matches!(self, NetType::Reg | NetType::Logic)
    }
}

/// The refinement state of a storage element.
///
/// Every register starts as `PotentialRegister` and is reclassified
/// exactly once, to `FlipFlop` or `Latch`, by the register classifier.
/// No register is left unresolved after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterKind {
    /// Declared as storage but not yet classified.
    PotentialRegister,
    /// Edge-triggered storage: assigned in a clocked procedural block.
    FlipFlop,
    /// Level-sensitive storage: never assigned in a clocked block.
    Latch,
}

/// A port in a module's external interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The declared storage type.
    pub net_type: NetType,
    /// Bit width, `|msb-lsb|+1`; 1 when no packed dimension is present
    /// or its bounds are symbolic.
    pub width: u32,
    /// 1-indexed source line of the port-name identifier.
    pub line: u32,
}

/// A named signal declared inside a module body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// The signal name.
    pub name: String,
    /// The declared storage type.
    pub net_type: NetType,
    /// Bit width, defaulting to 1.
    pub width: u32,
    /// 1-indexed source line of the declaration.
    pub line: u32,
}

/// A storage element declared as `reg` or `logic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Register {
    /// The register name.
    pub name: String,
    /// Bit width, defaulting to 1.
    pub width: u32,
    /// 1-indexed source line of the declaration.
    pub line: u32,
    /// The refinement state; final after classification.
    pub kind: RegisterKind,
}

/// A module parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The declared type keyword, `"integer"` when none is present.
    pub param_type: String,
    /// The raw default-value text; empty when no `=` clause was found.
    pub value: String,
    /// 1-indexed source line of the declaration.
    pub line: u32,
}

/// An instantiation of another module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// The name of the instantiated module type.
    pub module_type: String,
    /// The instance name.
    pub name: String,
    /// 1-indexed source line of the instantiation.
    pub line: u32,
}

/// Sensitivity classification of a procedural block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Level- or wildcard-sensitive (`always @(*)`, `always @(en)`).
    Combinational,
    /// Edge-sensitive (`always @(posedge clk)`).
    Sequential,
}

/// A signal name appearing as the left-hand target of an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignTarget {
    /// The first identifier of the assignment's left-hand side.
    pub name: String,
    /// 1-indexed source line of that identifier.
    pub line: u32,
}

/// A procedural block (`always` and friends) within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralBlock {
    /// Sensitivity classification.
    pub kind: BlockKind,
    /// `true` iff the event control contains `posedge` or `negedge`.
    pub has_clock_edge: bool,
    /// 1-indexed source line where the block starts.
    pub line: u32,
    /// Assignment targets collected anywhere within the block.
    pub targets: Vec<AssignTarget>,
}

/// The structural index of one declared hardware module.
///
/// Produced fresh per analysis; immutable except for the single in-place
/// register-kind update performed by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: String,
    /// The source file this module was declared in.
    pub file: PathBuf,
    /// 1-indexed source line of the module-name identifier (not the
    /// `module` keyword).
    pub line: u32,
    /// External interface ports.
    pub ports: Vec<Port>,
    /// Declared parameters.
    pub parameters: Vec<Parameter>,
    /// Internal signals (includes the declarations behind `registers`).
    pub signals: Vec<Signal>,
    /// Storage elements, classified after extraction.
    pub registers: Vec<Register>,
    /// Instantiations of other modules.
    pub instances: Vec<Instance>,
    /// Procedural blocks with their assignment targets.
    pub blocks: Vec<ProceduralBlock>,
    /// Targets of continuous (`assign`) statements.
    pub assigns: Vec<AssignTarget>,
}
