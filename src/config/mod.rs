//! Configuration for fw-sbom-checker.
//!
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.fw-sbom-checker.yaml` file in your project root or
//! `~/.config/fw-sbom-checker/`:
//!
//! ```yaml
//! catalog: releases.json
//! latest_sources:
//!   FreeRTOS:
//!     type: github_tags
//!     repo: FreeRTOS/FreeRTOS-Kernel
//! enrichment:
//!   enabled: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    default_monitored_libraries, DEFAULT_CATALOG_FILE, DEFAULT_NVD_API_BASE,
    DEFAULT_NVD_MAX_RESULTS, DEFAULT_OSV_API_BASE, DEFAULT_TIMEOUT_SECS, FIRMWARE_LIBRARIES,
};
pub use types::{AppConfig, AppConfigBuilder, EnrichmentConfig, LatestSourceConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    CliOverrides, ConfigFileError,
};
