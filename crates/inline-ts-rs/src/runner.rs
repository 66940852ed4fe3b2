//! File discovery and parallel transformation.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use inline_ts_rs::Pipeline;
use globset::{Glob, GlobSetBuilder};
use rayon::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use walkdir::WalkDir;

/// Runner errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Counters from one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files matching the extension allowlist.
    pub scanned: usize,
    /// Files whose rewritten output differs from the input.
    pub rewritten: usize,
}

/// Scans the workspace and transforms every eligible file.
///
/// In check mode nothing is written; otherwise each rewritten document
/// lands under `out_dir` at the same path relative to the workspace.
pub fn run(args: &Args, pipeline: &Pipeline) -> Result<RunSummary, RunnerError> {
    let workspace = &args.workspace;

    // Build ignore glob set
    let mut ignore_builder = GlobSetBuilder::new();
    for pattern in &args.ignore {
        let glob = Glob::new(pattern).map_err(|e| RunnerError::InvalidGlob(e.to_string()))?;
        ignore_builder.add(glob);
    }

    // Add default ignores. Candidates are matched workspace-relative, so the
    // out dir pattern must be relative too when it sits inside the workspace.
    let out_dir = args.out_dir.strip_prefix(workspace).unwrap_or(&args.out_dir);
    let out_dir_pattern = format!("{}/**", out_dir);
    for pattern in ["**/node_modules/**", "**/.git/**", out_dir_pattern.as_str()] {
        if let Ok(glob) = Glob::new(pattern) {
            ignore_builder.add(glob);
        }
    }

    let ignore_set = ignore_builder
        .build()
        .map_err(|e| RunnerError::InvalidGlob(e.to_string()))?;

    let files: Vec<Utf8PathBuf> = WalkDir::new(workspace)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| pipeline.wants(p.as_str()))
        .filter(|p| {
            let relative = p.strip_prefix(workspace).unwrap_or(p);
            !ignore_set.is_match(relative.as_str())
        })
        .collect();

    let rewritten = AtomicUsize::new(0);

    let results: Vec<Result<(), RunnerError>> = files
        .par_iter()
        .filter_map(|file_path| {
            let source = match fs::read_to_string(file_path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Failed to read {}: {}", file_path, e);
                    return None;
                }
            };

            let output = pipeline.transform(&source, file_path.as_str());
            if output == source {
                return None;
            }
            rewritten.fetch_add(1, Ordering::Relaxed);

            if args.check {
                println!("{}", file_path);
                return None;
            }

            Some(write_output(workspace, &args.out_dir, file_path, &output))
        })
        .collect();

    for result in results {
        result?;
    }

    Ok(RunSummary {
        scanned: files.len(),
        rewritten: rewritten.into_inner(),
    })
}

fn write_output(
    workspace: &Utf8Path,
    out_dir: &Utf8Path,
    file_path: &Utf8Path,
    output: &str,
) -> Result<(), RunnerError> {
    let relative = file_path.strip_prefix(workspace).unwrap_or(file_path);
    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| RunnerError::WriteFailed {
            path: target.clone(),
            source: e,
        })?;
    }
    fs::write(&target, output).map_err(|e| RunnerError::WriteFailed {
        path: target,
        source: e,
    })
}
