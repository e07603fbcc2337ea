//! Configuration validation.

use super::defaults::NVD_MAX_PAGE_SIZE;
use super::types::{AppConfig, EnrichmentConfig, LatestSourceConfig};
use crate::error::{CheckerError, Result};
use regex::Regex;

/// A single invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn error(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError {
        field: field.into(),
        message: message.into(),
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.enrichment.validate());

        if self.monitored_libraries.iter().any(|n| n.trim().is_empty()) {
            errors.push(error("monitored_libraries", "library names must not be blank"));
        }

        for (library, source) in &self.latest_sources {
            let field = format!("latest_sources.{library}");
            errors.extend(source.validate().into_iter().map(|mut e| {
                e.field = format!("{field}.{}", e.field);
                e
            }));
        }

        errors
    }
}

impl Validatable for EnrichmentConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.timeout_secs == 0 {
            errors.push(error("enrichment.timeout_secs", "must be at least 1"));
        }
        if self.nvd_max_results == 0 || self.nvd_max_results > NVD_MAX_PAGE_SIZE {
            errors.push(error(
                "enrichment.nvd_max_results",
                format!("must be between 1 and {NVD_MAX_PAGE_SIZE}"),
            ));
        }
        for (field, base) in [
            ("enrichment.osv_api_base", &self.osv_api_base),
            ("enrichment.nvd_api_base", &self.nvd_api_base),
        ] {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                errors.push(error(field, format!("'{base}' is not an http(s) URL")));
            }
        }
        errors
    }
}

fn check_pattern(field: &str, pattern: Option<&str>) -> Option<ConfigError> {
    let e = Regex::new(pattern?).err()?;
    Some(error(field, format!("invalid regex: {e}")))
}

impl Validatable for LatestSourceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        match self {
            Self::Catalog => {}
            Self::GithubTags { repo, tag_pattern } => {
                errors.extend(check_pattern("tag_pattern", tag_pattern.as_deref()));
                let parts: Vec<&str> = repo.trim_matches('/').split('/').collect();
                if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
                    errors.push(error("repo", format!("'{repo}' is not owner/repo")));
                }
            }
            Self::Changelog { url, pattern } => {
                errors.extend(check_pattern("pattern", pattern.as_deref()));
                if url.trim().is_empty() {
                    errors.push(error("url", "must not be empty"));
                }
            }
        }
        errors
    }
}

impl AppConfig {
    /// Fail with every validation message joined, if any.
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        Err(CheckerError::validation(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        ))
    }
}
