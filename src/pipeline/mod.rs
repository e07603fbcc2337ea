//! Reconciliation pipeline.
//!
//! Shared orchestration for read → reconcile → report workflows, used by
//! every CLI command handler.

mod output;
mod reconcile;
mod setup;
mod sources;

pub use output::{render_report, should_use_color, write_output, OutputTarget};
pub use reconcile::{Reconciler, RunSummary};
pub use setup::{
    build_reconciler, build_reconciler_with, build_scanner, catalog_path, library_filter,
    load_catalog,
};
pub use sources::{collect_sbom_paths, discover_sboms, load_sbom, LoadedSbom};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - nothing needs update (or `--fail-on-update` not given)
    pub const SUCCESS: i32 = 0;
    /// At least one library needs a security update
    pub const NEEDS_UPDATE: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
