//! Report type definitions.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Bordered terminal table (colored)
    #[default]
    Table,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Per-report metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// SBOM file name the results belong to
    pub sbom: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    #[must_use]
    pub fn new(sbom: impl Into<String>) -> Self {
        Self {
            sbom: sbom.into(),
            generated_at: Utc::now(),
        }
    }
}
