//! CLI command handlers.
//!
//! Testable command handlers invoked by main.rs. Each handler implements the
//! logic of one subcommand and returns the process exit code.

mod check;
mod libraries;
mod search;

pub use check::{run_check, CheckOptions};
pub use libraries::run_libraries;
pub use search::{run_search, SearchMatch};

use crate::config::AppConfig;
use crate::model::ResolvedLibrary;
use crate::pipeline::{collect_sbom_paths, library_filter, load_sbom, Reconciler};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Results for one SBOM file.
#[derive(Debug, Clone)]
pub(crate) struct SbomResults {
    pub path: PathBuf,
    pub name: String,
    pub libraries: Vec<ResolvedLibrary>,
}

/// Outcome of reconciling a set of SBOM files.
#[derive(Debug, Default)]
pub(crate) struct BatchRun {
    pub sboms: Vec<SbomResults>,
    /// SBOM files that could not be read
    pub failed: usize,
}

/// Read and reconcile every SBOM given (or found in `sbom_dir`).
///
/// An unreadable SBOM is logged and skipped; the run fails only when no
/// SBOM could be read at all. `keep` narrows the libraries reconciled.
pub(crate) fn reconcile_sboms(
    config: &AppConfig,
    reconciler: &Reconciler,
    paths: &[PathBuf],
    quiet: bool,
    keep: impl Fn(&str) -> bool,
) -> Result<BatchRun> {
    let paths = collect_sbom_paths(paths, config.sbom_dir.as_deref())?;
    if paths.is_empty() {
        bail!("No .json or .spdx SBOM files found");
    }

    let filter = library_filter(config);
    let mut run = BatchRun::default();
    for path in &paths {
        let loaded = match load_sbom(path, &filter, quiet) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("{e:#}");
                run.failed += 1;
                continue;
            }
        };
        let components: Vec<_> = loaded
            .libraries
            .iter()
            .filter(|c| keep(&c.name))
            .cloned()
            .collect();
        let libraries = reconciler.reconcile(&components);
        run.sboms.push(SbomResults {
            name: loaded.display_name(),
            path: loaded.path,
            libraries,
        });
    }

    if run.sboms.is_empty() {
        bail!("None of the {} SBOM files could be read", paths.len());
    }
    Ok(run)
}
