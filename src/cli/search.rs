//! Search command handler.
//!
//! Lists the SBOMs in which one library needs a security update.

use super::reconcile_sboms;
use crate::config::AppConfig;
use crate::model::LatestVersion;
use crate::pipeline::{build_reconciler, exit_codes, write_output, OutputTarget};
use crate::reports::ReportFormat;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// One SBOM where the searched library needs update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub sbom: String,
    pub path: PathBuf,
    pub library: String,
    pub current_version: String,
    pub latest_version: LatestVersion,
}

/// Run the search command
pub fn run_search(
    config: &AppConfig,
    library: &str,
    paths: &[PathBuf],
    quiet: bool,
) -> Result<i32> {
    let Some(canonical) = crate::pipeline::library_filter(config).canonicalize(library) else {
        bail!("Library '{library}' is not monitored");
    };

    let reconciler = build_reconciler(config)?;
    let run = reconcile_sboms(config, &reconciler, paths, quiet, |name| name == canonical)?;

    let matches: Vec<SearchMatch> = run
        .sboms
        .iter()
        .flat_map(|sbom| {
            sbom.libraries
                .iter()
                .filter(|lib| lib.needs_update())
                .map(move |lib| SearchMatch {
                    sbom: sbom.name.clone(),
                    path: sbom.path.clone(),
                    library: lib.name.clone(),
                    current_version: lib.current_version.clone(),
                    latest_version: lib.latest_version.clone(),
                })
        })
        .collect();

    let output = match config.output.format {
        ReportFormat::Json => serde_json::to_string_pretty(&matches)
            .context("Failed to serialize search results")?,
        ReportFormat::Table => format_matches(&canonical, &matches),
    };
    write_output(
        &output,
        &OutputTarget::from_option(config.output.file.clone()),
        quiet,
    )?;

    if run.failed > 0 {
        return Ok(exit_codes::ERROR);
    }
    Ok(exit_codes::SUCCESS)
}

fn format_matches(library: &str, matches: &[SearchMatch]) -> String {
    if matches.is_empty() {
        return format!("No SBOM has '{library}' needing update.");
    }
    let mut out = format!("SBOMs with '{library}' needing update:");
    for m in matches {
        out.push_str(&format!(
            "\n  {} -> current: {} | latest: {}",
            m.sbom, m.current_version, m.latest_version
        ));
    }
    out
}
