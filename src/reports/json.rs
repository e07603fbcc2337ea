//! JSON report generator.

use super::{ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::ResolvedLibrary;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    sbom: &'a str,
    libraries: &'a [ResolvedLibrary],
}

/// JSON report generator
#[derive(Debug, Clone, Copy)]
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    #[must_use]
    pub const fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, results: &[ResolvedLibrary], context: &ReportContext) -> Result<String, ReportError> {
        let report = JsonReport {
            generated_at: context.generated_at,
            sbom: &context.sbom,
            libraries: results,
        };
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        rendered.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
