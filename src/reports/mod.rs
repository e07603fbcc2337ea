//! Report generation for reconciliation results.
//!
//! - Table: bordered, colored terminal output with release notes and
//!   vulnerability findings
//! - JSON: structured data for programmatic integration

mod json;
mod table;
mod types;

pub use json::JsonReporter;
pub use table::TableReporter;
pub use types::{ReportContext, ReportFormat};

use crate::error::CheckerError;
use crate::model::ResolvedLibrary;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<ReportError> for CheckerError {
    fn from(err: ReportError) -> Self {
        Self::Report(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the results of one SBOM.
    fn generate(&self, results: &[ResolvedLibrary], context: &ReportContext) -> Result<String, ReportError>;

    /// Write the rendered report to a writer
    fn write_report(
        &self,
        results: &[ResolvedLibrary],
        context: &ReportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate(results, context)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Table if colored => Box::new(TableReporter::new()),
        ReportFormat::Table => Box::new(TableReporter::new().no_color()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
