//! The four query operations over a corpus snapshot.
//!
//! All operations are pure and deterministic for a fixed snapshot.
//! Lookups that name a missing module fail with a typed error; signal
//! traces return empty lists instead, so exploration never errors.

use crate::corpus::Corpus;
use crate::error::QueryError;
use rtlscope_extract::{Instance, Module, Parameter, Port, PortDirection, Register, RegisterKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Register-kind filter for [`query_registers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFilter {
    /// Only edge-triggered registers.
    FlipFlop,
    /// Only level-sensitive registers.
    Latch,
    /// Every classified register.
    All,
}

impl KindFilter {
    fn matches(self, kind: RegisterKind) -> bool {
        match self {
            KindFilter::FlipFlop => kind == RegisterKind::FlipFlop,
            KindFilter::Latch => kind == RegisterKind::Latch,
            KindFilter::All => true,
        }
    }
}

/// One register matched by [`query_registers`], with its owning module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterHit {
    /// The module the register was declared in.
    pub module: String,
    /// The matched register.
    pub register: Register,
}

/// Returns registers filtered by module scope and kind.
///
/// With `scope = None` the whole corpus is searched. A scope naming a
/// module absent from the corpus is an [`QueryError::InvalidScope`].
pub fn query_registers(
    corpus: &Corpus,
    scope: Option<&str>,
    kind: KindFilter,
) -> Result<Vec<RegisterHit>, QueryError> {
    if let Some(name) = scope {
        if !corpus.contains_module(name) {
            return Err(QueryError::InvalidScope(name.to_string()));
        }
    }
    let mut hits = Vec::new();
    for module in in_scope(corpus, scope) {
        for register in &module.registers {
            if kind.matches(register.kind) {
                hits.push(RegisterHit {
                    module: module.name.clone(),
                    register: register.clone(),
                });
            }
        }
    }
    Ok(hits)
}

/// The facet of a module requested from [`analyze_module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleFacet {
    /// Instances inside the module and the modules instantiating it.
    Hierarchy,
    /// The module's ports.
    Ports,
    /// The module's parameters.
    Parameters,
    /// Every facet.
    All,
}

/// The hierarchy facet: what a module contains and who contains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyReport {
    /// Instantiations inside the module.
    pub instances: Vec<Instance>,
    /// Names of corpus modules that instantiate this one.
    pub instantiated_by: Vec<String>,
}

/// The answer to [`analyze_module`]: requested facets of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleReport {
    /// The module name.
    pub name: String,
    /// The file the module was extracted from.
    pub file: PathBuf,
    /// The module's declaration line.
    pub line: u32,
    /// Hierarchy facet, when requested.
    pub hierarchy: Option<HierarchyReport>,
    /// Ports facet, when requested.
    pub ports: Option<Vec<Port>>,
    /// Parameters facet, when requested.
    pub parameters: Option<Vec<Parameter>>,
}

/// Returns the requested facets of the named module.
///
/// Fails with [`QueryError::ModuleNotFound`] if the corpus has no module
/// of that name.
pub fn analyze_module(
    corpus: &Corpus,
    name: &str,
    facet: ModuleFacet,
) -> Result<ModuleReport, QueryError> {
    let module = corpus
        .module(name)
        .ok_or_else(|| QueryError::ModuleNotFound(name.to_string()))?;

    let want_hierarchy = matches!(facet, ModuleFacet::Hierarchy | ModuleFacet::All);
    let want_ports = matches!(facet, ModuleFacet::Ports | ModuleFacet::All);
    let want_parameters = matches!(facet, ModuleFacet::Parameters | ModuleFacet::All);

    let hierarchy = want_hierarchy.then(|| HierarchyReport {
        instances: module.instances.clone(),
        instantiated_by: corpus
            .modules()
            .iter()
            .filter(|m| m.instances.iter().any(|i| i.module_type == name))
            .map(|m| m.name.clone())
            .collect(),
    });

    Ok(ModuleReport {
        name: module.name.clone(),
        file: module.file.clone(),
        line: module.line,
        hierarchy,
        ports: want_ports.then(|| module.ports.clone()),
        parameters: want_parameters.then(|| module.parameters.clone()),
    })
}

/// How a traced name appears at a given site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceRole {
    /// The name is declared here (port, signal, or register).
    Declaration,
    /// The name is the target of an assignment here.
    Assignment,
}

/// One site where a traced signal name appears.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceHit {
    /// The module the site belongs to.
    pub module: String,
    /// 1-indexed source line.
    pub line: u32,
    /// Declaration or assignment site.
    pub role: TraceRole,
}

/// Returns every site where a signal, port, or register of the given
/// name is declared or assigned.
///
/// Always succeeds: a name (or scope) that occurs nowhere yields an
/// empty list, never an error.
pub fn trace_signal(corpus: &Corpus, name: &str, scope: Option<&str>) -> Vec<TraceHit> {
    let mut sites = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |sites: &mut Vec<TraceHit>, module: &str, line: u32, role: TraceRole| {
        let site = TraceHit {
            module: module.to_string(),
            line,
            role,
        };
        if seen.insert(site.clone()) {
            sites.push(site);
        }
    };

    for module in in_scope(corpus, scope) {
        for port in &module.ports {
            if port.name == name {
                push(&mut sites, &module.name, port.line, TraceRole::Declaration);
            }
        }
        for signal in &module.signals {
            if signal.name == name {
                push(&mut sites, &module.name, signal.line, TraceRole::Declaration);
            }
        }
        for register in &module.registers {
            if register.name == name {
                push(
                    &mut sites,
                    &module.name,
                    register.line,
                    TraceRole::Declaration,
                );
            }
        }
        for block in &module.blocks {
            for target in &block.targets {
                if target.name == name {
                    push(&mut sites, &module.name, target.line, TraceRole::Assignment);
                }
            }
        }
        for assign in &module.assigns {
            if assign.name == name {
                push(&mut sites, &module.name, assign.line, TraceRole::Assignment);
            }
        }
    }
    sites
}

/// Aggregate counts over the whole corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectStats {
    /// Number of modules.
    pub modules: usize,
    /// Number of flip-flop registers.
    pub flip_flops: usize,
    /// Number of latch registers.
    pub latches: usize,
    /// Number of input ports.
    pub inputs: usize,
    /// Number of output ports.
    pub outputs: usize,
    /// Number of inout ports.
    pub inouts: usize,
    /// Number of module instantiations.
    pub instances: usize,
}

/// Computes aggregate statistics over the whole corpus.
///
/// An empty corpus yields all-zero counts, not an error.
pub fn project_stats(corpus: &Corpus) -> ProjectStats {
    let mut stats = ProjectStats {
        modules: corpus.len(),
        ..ProjectStats::default()
    };
    for module in corpus.modules() {
        for register in &module.registers {
            match register.kind {
                RegisterKind::FlipFlop => stats.flip_flops += 1,
                RegisterKind::Latch => stats.latches += 1,
                RegisterKind::PotentialRegister => {}
            }
        }
        for port in &module.ports {
            match port.direction {
                PortDirection::Input => stats.inputs += 1,
                PortDirection::Output => stats.outputs += 1,
                PortDirection::Inout => stats.inouts += 1,
            }
        }
        stats.instances += module.instances.len();
    }
    stats
}

fn in_scope<'a>(corpus: &'a Corpus, scope: Option<&'a str>) -> impl Iterator<Item = &'a Module> {
    corpus
        .modules()
        .iter()
        .filter(move |m| scope.map_or(true, |s| m.name == s))
}
