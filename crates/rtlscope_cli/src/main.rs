//! rtlscope CLI — the command-line interface for the RTL structural
//! analysis engine.
//!
//! Provides `rtlscope extract` for decoding CST dumps and extracting
//! module records, and `rtlscope query` for structural queries
//! (registers, module facets, signal traces, project statistics) over a
//! previously extracted index.

#![warn(missing_docs)]

mod extract;
mod query;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use rtlscope_query::{KindFilter, ModuleFacet};

/// rtlscope — structural analysis for RTL designs.
#[derive(Parser, Debug)]
#[command(name = "rtlscope", version, about = "RTL structural analysis engine")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode CST dumps and extract module records to a JSON index.
    Extract(ExtractArgs),
    /// Run structural queries against an extracted index.
    Query(QueryArgs),
}

/// Arguments for the `rtlscope extract` subcommand.
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Source files to analyze. Each must have a CST dump next to it
    /// (see `--dump-ext`).
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Extension appended to a source path to locate its CST dump
    /// (`top.v` -> `top.v.tree`).
    #[arg(long, default_value = "tree")]
    pub dump_ext: String,

    /// Write the JSON index to this path instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Cache directory for incremental re-analysis.
    #[arg(long, default_value = ".rtlscope-cache")]
    pub cache_dir: String,

    /// Disable the analysis cache.
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the `rtlscope query` subcommand.
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Path to a JSON index produced by `rtlscope extract`.
    #[arg(short, long)]
    pub index: String,

    /// Output format for query results.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The query to run.
    #[command(subcommand)]
    pub query: QueryCommand,
}

/// Available structural queries.
#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// List registers, optionally filtered by module and kind.
    Registers {
        /// Restrict to one module.
        #[arg(short, long)]
        scope: Option<String>,

        /// Register kind to report.
        #[arg(short, long, value_enum, default_value_t = RegisterFilter::All)]
        kind: RegisterFilter,
    },
    /// Report one module's hierarchy, ports, or parameters.
    Module {
        /// The module name.
        name: String,

        /// Which facet of the module to report.
        #[arg(long, value_enum, default_value_t = FacetArg::All)]
        facet: FacetArg,
    },
    /// Find every declaration and assignment of a signal name.
    Trace {
        /// The signal name.
        name: String,

        /// Restrict to one module.
        #[arg(short, long)]
        scope: Option<String>,
    },
    /// Aggregate statistics over the whole index.
    Stats,
}

/// Register kind filter for `rtlscope query registers`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RegisterFilter {
    /// Edge-triggered registers only.
    FlipFlop,
    /// Level-sensitive registers only.
    Latch,
    /// All registers.
    All,
}

impl From<RegisterFilter> for KindFilter {
    fn from(f: RegisterFilter) -> Self {
        match f {
            RegisterFilter::FlipFlop => KindFilter::FlipFlop,
            RegisterFilter::Latch => KindFilter::Latch,
            RegisterFilter::All => KindFilter::All,
        }
    }
}

/// Module facet selection for `rtlscope query module`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FacetArg {
    /// Instances inside the module and its instantiators.
    Hierarchy,
    /// The module's ports.
    Ports,
    /// The module's parameters.
    Parameters,
    /// Every facet.
    All,
}

impl From<FacetArg> for ModuleFacet {
    fn from(f: FacetArg) -> Self {
        match f {
            FacetArg::Hierarchy => ModuleFacet::Hierarchy,
            FacetArg::Ports => ModuleFacet::Ports,
            FacetArg::Parameters => ModuleFacet::Parameters,
            FacetArg::All => ModuleFacet::All,
        }
    }
}

/// Query result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Extract(ref args) => extract::run(args, &global),
        Command::Query(ref args) => query::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
