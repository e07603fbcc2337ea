//! Check command handler.
//!
//! Reconciles each SBOM and prints one report per file.

use super::reconcile_sboms;
use crate::config::AppConfig;
use crate::pipeline::{
    build_reconciler, exit_codes, render_report, should_use_color, write_output, OutputTarget,
    RunSummary,
};
use crate::reports::ReportFormat;
use anyhow::Result;
use std::path::PathBuf;

/// Options of the `check` subcommand.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// SBOM files or directories; `sbom_dir` when empty
    pub paths: Vec<PathBuf>,
    /// Exit with 1 when any library needs update
    pub fail_on_update: bool,
    pub quiet: bool,
}

/// Run the check command
pub fn run_check(config: &AppConfig, options: &CheckOptions) -> Result<i32> {
    let reconciler = build_reconciler(config)?;
    let run = reconcile_sboms(config, &reconciler, &options.paths, options.quiet, |_| true)?;

    let target = OutputTarget::from_option(config.output.file.clone());
    let colored = should_use_color(config.output.no_color, &target);

    let mut reports = Vec::with_capacity(run.sboms.len());
    let mut needs_update = false;
    for sbom in &run.sboms {
        let summary = RunSummary::from_results(&sbom.libraries);
        if !options.quiet {
            summary.log(&sbom.name);
        }
        needs_update |= summary.any_needs_update();
        reports.push(render_report(
            config.output.format,
            colored,
            &sbom.name,
            &sbom.libraries,
        )?);
    }

    write_output(&join_reports(config.output.format, &reports), &target, options.quiet)?;

    if run.failed > 0 {
        return Ok(exit_codes::ERROR);
    }
    if options.fail_on_update && needs_update {
        return Ok(exit_codes::NEEDS_UPDATE);
    }
    Ok(exit_codes::SUCCESS)
}

/// Several JSON reports become one array; tables are stacked.
fn join_reports(format: ReportFormat, reports: &[String]) -> String {
    match format {
        ReportFormat::Json if reports.len() > 1 => format!("[\n{}\n]", reports.join(",\n")),
        ReportFormat::Json | ReportFormat::Table => reports.join("\n"),
    }
}
