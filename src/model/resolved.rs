//! Reconciliation output consumed by the report layer.
//!
//! The report layer colors rows purely from the `status` and
//! `security_label` tokens, so their string forms are fixed here and nowhere
//! else.

use super::{ReleaseRecord, VulnerabilityReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display token for a latest version that could not be determined.
pub const NOT_DETERMINED: &str = "not determined";

/// Update status of a declared library version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// No release history, or the declared version is not catalogued
    Unknown,
    /// Catalogued, with no later security release
    UpToDate,
    /// At least one later release is flagged as a security release
    NeedsUpdate,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::UpToDate => "up-to-date",
            Self::NeedsUpdate => "needs-update",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Security verdict on the releases published after the declared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityLabel {
    #[serde(rename = "n/a")]
    NotApplicable,
    #[serde(rename = "secure")]
    Secure,
    #[serde(rename = "not-secure")]
    NotSecure,
}

impl SecurityLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotApplicable => "n/a",
            Self::Secure => "secure",
            Self::NotSecure => "not-secure",
        }
    }
}

impl fmt::Display for SecurityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known upstream version, or the "not determined" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LatestVersion {
    Known(String),
    #[default]
    NotDetermined,
}

impl LatestVersion {
    /// The known version, if any.
    #[must_use]
    pub fn as_known(&self) -> Option<&str> {
        match self {
            Self::Known(v) => Some(v),
            Self::NotDetermined => None,
        }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for LatestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => f.write_str(v),
            Self::NotDetermined => f.write_str(NOT_DETERMINED),
        }
    }
}

impl From<LatestVersion> for String {
    fn from(value: LatestVersion) -> Self {
        value.to_string()
    }
}

impl From<String> for LatestVersion {
    fn from(value: String) -> Self {
        if value.is_empty() || value == NOT_DETERMINED {
            Self::NotDetermined
        } else {
            Self::Known(value)
        }
    }
}

impl From<Option<String>> for LatestVersion {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NotDetermined, Self::from)
    }
}

/// Reconciliation result for one SBOM library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLibrary {
    /// Canonical library name
    pub name: String,
    /// Declared version after normalization
    pub current_version: String,
    /// Catalog date of the declared release, when catalogued
    pub current_release_date: Option<String>,
    /// Latest version reported by the registered latest-version strategy
    pub latest_version: LatestVersion,
    /// Catalog date of the newest catalogued release
    pub latest_release_date: Option<String>,
    pub status: Status,
    pub security_label: SecurityLabel,
    /// Later releases flagged as security releases, in release order
    pub security_notes: Vec<ReleaseRecord>,
    /// Provenance of `latest_version` (e.g. `catalog`, `github:owner/repo`)
    pub source: String,
    /// Canonical versions catalogued more than once for this library
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_versions: Vec<String>,
    /// Vulnerability findings, when scanning was enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<VulnerabilityReport>,
}

impl ResolvedLibrary {
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.status == Status::NeedsUpdate
    }

    /// Number of vulnerability findings across all sources.
    #[must_use]
    pub fn vulnerability_count(&self) -> usize {
        self.vulnerabilities
            .as_ref()
            .map_or(0, VulnerabilityReport::total)
    }
}
