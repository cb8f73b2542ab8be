//! `rtlscope extract` — decode dumps and build the module index.
//!
//! For each source file the matching CST dump is decoded, modules are
//! extracted and classified, and the resulting records are written as a
//! JSON index. The source set is partitioned against the cache manifest:
//! unchanged files are served from the analysis cache, the rest are
//! analyzed in parallel, and manifest entries for files that left the
//! source set are pruned. A file that fails to decode is reported and
//! skipped, the rest of the run continues.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rtlscope_cache::{Cache, ChangeSet};
use rtlscope_diagnostics::{Diagnostic, DiagnosticSink};
use rtlscope_extract::Module;
use rtlscope_source::{SourceDb, SourceFile};

use crate::{ExtractArgs, GlobalArgs};

/// Runs the `rtlscope extract` command.
///
/// Returns exit code 0 on success, 1 if any file failed to analyze.
pub fn run(args: &ExtractArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let tool_version = env!("CARGO_PKG_VERSION");
    let mut cache = if args.no_cache {
        None
    } else {
        Some(Cache::load_or_create(
            Path::new(&args.cache_dir),
            tool_version,
        ))
    };

    let paths: Vec<PathBuf> = args.sources.iter().map(PathBuf::from).collect();
    let changes = match cache.as_ref() {
        Some(c) => c.detect_changes(&paths)?,
        None => ChangeSet::all_dirty(&paths)?,
    };

    let mut all_modules = Vec::new();
    let mut dirty = changes.dirty;

    if let Some(c) = cache.as_ref() {
        for (path, hash) in &changes.unchanged {
            match c.load_modules(path) {
                Some(modules) => {
                    if global.verbose {
                        eprintln!("   Cached {}", path.display());
                    }
                    all_modules.extend(modules);
                }
                // Manifest says unchanged but the artifact is gone or
                // invalid; re-analyze.
                None => dirty.push((path.clone(), *hash)),
            }
        }
    }

    if !global.quiet && !dirty.is_empty() {
        eprintln!("   Analyzing {} file(s)", dirty.len());
    }

    let results: Vec<_> = dirty
        .par_iter()
        .map(|(path, hash)| analyze_file(path, &args.dump_ext).map(|r| (path, *hash, r)))
        .collect();

    let mut failed = false;
    for result in results {
        match result {
            Ok((path, hash, (modules, warnings))) => {
                if !global.quiet {
                    for line in &warnings {
                        eprintln!("{line}");
                    }
                }
                if let Some(cache) = cache.as_mut() {
                    cache.store_modules(path, hash, &modules)?;
                }
                all_modules.extend(modules);
            }
            Err(message) => {
                eprintln!("error: {message}");
                failed = true;
            }
        }
    }

    if let Some(cache) = cache.as_mut() {
        cache.remove_deleted(&changes.deleted);
        cache.save()?;
    }

    let json = serde_json::to_string_pretty(&all_modules)?;
    match &args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(if failed { 1 } else { 0 })
}

/// Returns the CST dump path for a source file: `<source>.<ext>`.
fn dump_path_for(source: &Path, ext: &str) -> PathBuf {
    let mut os = source.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

/// Decodes and extracts one source file.
///
/// Returns the extracted modules and rendered warning lines, or an error
/// message naming the file. String errors keep this usable from the
/// parallel section.
fn analyze_file(source: &Path, dump_ext: &str) -> Result<(Vec<Module>, Vec<String>), String> {
    let dump_path = dump_path_for(source, dump_ext);
    let dump = std::fs::read_to_string(&dump_path)
        .map_err(|e| format!("{}: {e}", dump_path.display()))?;

    let mut db = SourceDb::new();
    let id = db
        .load_file(source)
        .map_err(|e| format!("{}: {e}", source.display()))?;
    let file = db.get_file(id);

    let sink = DiagnosticSink::new();
    let modules = rtlscope_extract::analyze_dump(&dump, file, &sink)
        .map_err(|e| format!("{}: {e}", dump_path.display()))?;

    let warnings = sink
        .take_all()
        .iter()
        .map(|d| render_diagnostic(d, file, &dump_path))
        .collect();

    Ok((modules, warnings))
}

/// Renders a diagnostic as a single terminal line.
///
/// Decoder diagnostics carry a dump line in their notes instead of a
/// span; extractor diagnostics carry a span into the source file.
fn render_diagnostic(diag: &Diagnostic, file: &SourceFile, dump_path: &Path) -> String {
    let location = if diag.primary_span.is_dummy() {
        format!("{}: {}", dump_path.display(), diag.notes.join(", "))
    } else {
        format!(
            "{}:{}",
            file.path.display(),
            file.line_of(diag.primary_span.start)
        )
    };
    format!(
        "{}[{}]: {} ({location})",
        diag.severity, diag.code, diag.message
    )
}
