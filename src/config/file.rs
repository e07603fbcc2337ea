//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".fw-sbom-checker.yaml",
    ".fw-sbom-checker.yml",
    "fw-sbom-checker.yaml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/fw-sbom-checker/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("fw-sbom-checker")) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ConfigFileError> for crate::error::CheckerError {
    fn from(err: ConfigFileError) -> Self {
        match err {
            ConfigFileError::Io(source) => Self::from(source),
            other => Self::config(other.to_string()),
        }
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Command-line Overrides
// ============================================================================

impl AppConfig {
    /// Apply command-line values. Every value that was given wins over the
    /// file, even when it equals the default.
    pub fn apply_cli(&mut self, cli: &CliOverrides) {
        if cli.catalog.is_some() {
            self.catalog.clone_from(&cli.catalog);
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        if cli.output_file.is_some() {
            self.output.file.clone_from(&cli.output_file);
        }
        if cli.no_color {
            self.output.no_color = true;
        }
        if cli.enrich {
            self.enrichment.enabled = true;
        }
        if let Some(timeout) = cli.api_timeout_secs {
            self.enrichment.timeout_secs = timeout;
        }
    }

    /// Load from file and apply CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &CliOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.apply_cli(cli_overrides);
        (config, loaded_from)
    }
}

/// Values passed on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub catalog: Option<PathBuf>,
    pub format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub no_color: bool,
    pub enrich: bool,
    pub api_timeout_secs: Option<u64>,
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// A commented example config with every option.
#[must_use]
pub fn generate_example_config() -> String {
    r"# fw-sbom-checker configuration
# Place this file at .fw-sbom-checker.yaml in your project root
# or in ~/.config/fw-sbom-checker/. CLI arguments override it.

# JSON release catalog
catalog: releases.json

# Directory scanned for SBOMs when `check` gets no paths
sbom_dir: sbom

# Libraries to reconcile (canonical names)
monitored_libraries:
  - FreeRTOS
  - LwIP
  - mbedTLS

# Vulnerability identities overriding the built-in table
known_refs:
  FatFs:
    ecosystem: GIT
    name: https://github.com/abbrev/fatfs

# Where each library's latest version comes from (default: catalog)
latest_sources:
  FreeRTOS:
    type: github_tags
    repo: FreeRTOS/FreeRTOS-Kernel
  LwIP:
    type: github_tags
    repo: lwip-tcpip/lwip
    tag_pattern: '^STABLE-(\d+_\d+_\d+)$'
  mbedTLS:
    type: changelog
    url: https://raw.githubusercontent.com/Mbed-TLS/mbedtls/development/ChangeLog

# Vulnerability lookups
enrichment:
  enabled: false
  osv: true
  nvd: true
  timeout_secs: 15
  nvd_max_results: 20

output:
  # Format: table, json
  format: table
  no_color: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
