//! `rtlscope query` — structural queries against an extracted index.
//!
//! Loads a JSON index produced by `rtlscope extract`, rebuilds the
//! corpus, and runs one of the four query operations against it.

use std::collections::HashMap;
use std::path::PathBuf;

use rtlscope_extract::Module;
use rtlscope_query::{
    analyze_module, project_stats, query_registers, trace_signal, Corpus, CorpusStore,
};

use crate::{GlobalArgs, QueryArgs, QueryCommand, ReportFormat};

/// Runs the `rtlscope query` command.
///
/// Returns exit code 0 on success; a query naming a missing module
/// surfaces as an error and exit code 1 (via `main`).
pub fn run(args: &QueryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(&args.index)?;
    let modules: Vec<Module> = serde_json::from_str(&json)?;

    if global.verbose {
        eprintln!("   Loaded {} module(s) from {}", modules.len(), args.index);
    }

    let corpus = build_corpus(modules);

    match &args.query {
        QueryCommand::Registers { scope, kind } => {
            let hits = query_registers(&corpus, scope.as_deref(), (*kind).into())?;
            match args.format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
                ReportFormat::Text => {
                    for hit in &hits {
                        println!(
                            "{}.{}  [{}]  width {}  line {}",
                            hit.module,
                            hit.register.name,
                            kind_name(hit.register.kind),
                            hit.register.width,
                            hit.register.line
                        );
                    }
                    if !global.quiet {
                        eprintln!("   {} register(s)", hits.len());
                    }
                }
            }
        }
        QueryCommand::Module { name, facet } => {
            let report = analyze_module(&corpus, name, (*facet).into())?;
            match args.format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                ReportFormat::Text => {
                    println!("module {} ({}:{})", report.name, report.file.display(), report.line);
                    if let Some(ports) = &report.ports {
                        println!("  ports:");
                        for p in ports {
                            println!("    {}  width {}  line {}", p.name, p.width, p.line);
                        }
                    }
                    if let Some(parameters) = &report.parameters {
                        println!("  parameters:");
                        for p in parameters {
                            println!("    {} {} = {}", p.param_type, p.name, p.value);
                        }
                    }
                    if let Some(hierarchy) = &report.hierarchy {
                        println!("  instances:");
                        for i in &hierarchy.instances {
                            println!("    {} {}  line {}", i.module_type, i.name, i.line);
                        }
                        println!("  instantiated by:");
                        for parent in &hierarchy.instantiated_by {
                            println!("    {parent}");
                        }
                    }
                }
            }
        }
        QueryCommand::Trace { name, scope } => {
            let sites = trace_signal(&corpus, name, scope.as_deref());
            match args.format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&sites)?),
                ReportFormat::Text => {
                    for site in &sites {
                        println!("{}:{}  {:?}", site.module, site.line, site.role);
                    }
                    if !global.quiet {
                        eprintln!("   {} site(s)", sites.len());
                    }
                }
            }
        }
        QueryCommand::Stats => {
            let stats = project_stats(&corpus);
            match args.format {
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                ReportFormat::Text => {
                    println!("modules:    {}", stats.modules);
                    println!("flip-flops: {}", stats.flip_flops);
                    println!("latches:    {}", stats.latches);
                    println!("inputs:     {}", stats.inputs);
                    println!("outputs:    {}", stats.outputs);
                    println!("inouts:     {}", stats.inouts);
                    println!("instances:  {}", stats.instances);
                }
            }
        }
    }

    Ok(0)
}

/// Rebuilds a corpus snapshot from a flat module list, grouping modules
/// by their source file.
fn build_corpus(modules: Vec<Module>) -> std::sync::Arc<Corpus> {
    let mut by_file: HashMap<PathBuf, Vec<Module>> = HashMap::new();
    for module in modules {
        by_file.entry(module.file.clone()).or_default().push(module);
    }

    let store = CorpusStore::new();
    for (path, modules) in by_file {
        store.insert_file(&path, modules);
    }
    store.snapshot()
}

fn kind_name(kind: rtlscope_extract::RegisterKind) -> &'static str {
    match kind {
        rtlscope_extract::RegisterKind::FlipFlop => "flip_flop",
        rtlscope_extract::RegisterKind::Latch => "latch",
        rtlscope_extract::RegisterKind::PotentialRegister => "potential_register",
    }
}
