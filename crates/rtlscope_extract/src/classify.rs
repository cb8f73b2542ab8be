//! Register classification: flip-flop vs. latch.
//!
//! A procedural block infers edge-triggered storage iff its event control
//! contains `posedge` or `negedge`. Every register assigned in any such
//! clocked block is a flip-flop; every other declared register is a latch.
//! This approximates the standard synthesis convention without building a
//! control/data-flow graph, which is sufficient for structural and
//! statistical queries (not for functional verification).

use crate::model::{Module, ProceduralBlock, Register, RegisterKind};
use std::collections::HashSet;

/// Returns the union of assignment-target names across all clocked blocks.
pub fn clocked_targets(blocks: &[ProceduralBlock]) -> HashSet<&str> {
    blocks
        .iter()
        .filter(|b| b.has_clock_edge)
        .flat_map(|b| b.targets.iter().map(|t| t.name.as_str()))
        .collect()
}

/// Classifies one register name against the clocked-target set.
///
/// Pure: the same inputs always produce the same kind. A register written
/// in both a clocked and an unclocked block classifies as a flip-flop
/// (clocked membership takes precedence). A register never assigned
/// anywhere classifies as a latch.
pub fn classify_kind(name: &str, clocked: &HashSet<&str>) -> RegisterKind {
    if clocked.contains(name) {
        RegisterKind::FlipFlop
    } else {
        RegisterKind::Latch
    }
}

/// Applies classification to every provisional register in the module.
///
/// This is the single in-place kind update of a register's lifecycle; after
/// it runs, no register is left as `PotentialRegister`.
pub fn classify_module(module: &mut Module) {
    let clocked = clocked_targets(&module.blocks);
    let kinds: Vec<RegisterKind> = module
        .registers
        .iter()
        .map(|r| classify_kind(&r.name, &clocked))
        .collect();
    for (register, kind) in module.registers.iter_mut().zip(kinds) {
        register.kind = kind;
    }
}

/// Convenience accessor used by tests and queries.
pub fn kinds_of(registers: &[Register]) -> Vec<RegisterKind> {
    registers.iter().map(|r| r.kind).collect()
}
