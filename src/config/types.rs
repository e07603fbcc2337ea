//! Configuration types for fw-sbom-checker.

use super::defaults::{
    default_monitored_libraries, DEFAULT_NVD_API_BASE, DEFAULT_NVD_MAX_RESULTS,
    DEFAULT_OSV_API_BASE, DEFAULT_TIMEOUT_SECS,
};
use crate::enrichment::KnownRef;
use crate::reports::ReportFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Application configuration loaded from a YAML file and CLI arguments.
///
/// CLI arguments override file settings (see [`AppConfig::merge`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON release catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Directory scanned for SBOM files when no paths are given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sbom_dir: Option<PathBuf>,
    /// Canonical names of the libraries to reconcile
    pub monitored_libraries: Vec<String>,
    /// Vulnerability identities overriding the built-in table
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub known_refs: IndexMap<String, KnownRef>,
    /// Latest-version strategy per library (catalog when absent)
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub latest_sources: IndexMap<String, LatestSourceConfig>,
    pub enrichment: EnrichmentConfig,
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            sbom_dir: None,
            monitored_libraries: default_monitored_libraries(),
            known_refs: IndexMap::new(),
            latest_sources: IndexMap::new(),
            enrichment: EnrichmentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog = Some(path.into());
        self
    }

    pub fn sbom_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.sbom_dir = Some(path.into());
        self
    }

    pub fn latest_source(mut self, library: impl Into<String>, source: LatestSourceConfig) -> Self {
        self.config.latest_sources.insert(library.into(), source);
        self
    }

    pub fn enrichment(mut self, config: EnrichmentConfig) -> Self {
        self.config.enrichment = config;
        self
    }

    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Latest-version strategies
// ============================================================================

/// Where a library's latest version comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LatestSourceConfig {
    /// Newest catalogued release
    Catalog,
    /// Highest tag of a GitHub repository
    GithubTags {
        /// `owner/repo`
        repo: String,
        /// Regex selecting tags; group 1 is the version
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag_pattern: Option<String>,
    },
    /// Highest version mentioned on a changelog page
    Changelog {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
}

// ============================================================================
// Enrichment Configuration
// ============================================================================

/// Vulnerability lookup configuration.
///
/// Always defined regardless of the `enrichment` feature flag; without the
/// feature no provider is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Query vulnerability sources at all
    pub enabled: bool,
    /// Query OSV
    pub osv: bool,
    /// Query the NVD CVE catalog
    pub nvd: bool,
    /// Timeout for every request, in seconds
    pub timeout_secs: u64,
    /// NVD `resultsPerPage`
    pub nvd_max_results: u32,
    pub osv_api_base: String,
    pub nvd_api_base: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            osv: true,
            nvd: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            nvd_max_results: DEFAULT_NVD_MAX_RESULTS,
            osv_api_base: DEFAULT_OSV_API_BASE.to_string(),
            nvd_api_base: DEFAULT_NVD_API_BASE.to_string(),
        }
    }
}

impl EnrichmentConfig {
    /// Enabled with both sources.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Table,
            file: None,
            no_color: false,
        }
    }
}
