//! OSV API request and response types.
//!
//! See: <https://google.github.io/osv.dev/post-v1-query/>

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsvQuery {
    pub package: OsvPackage,
    /// Omitted when the purl already pins a version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Package selector: a purl, or a name with an optional ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OsvPackage {
    Purl {
        purl: String,
    },
    Named {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        ecosystem: Option<String>,
    },
}

impl OsvQuery {
    /// Query by purl; `version` is dropped when the purl embeds one.
    #[must_use]
    pub fn from_purl(purl: String, version: Option<String>) -> Self {
        Self {
            package: OsvPackage::Purl { purl },
            version,
        }
    }

    #[must_use]
    pub fn from_package(name: String, ecosystem: Option<String>, version: String) -> Self {
        Self {
            package: OsvPackage::Named { name, ecosystem },
            version: Some(version),
        }
    }
}

/// Response of `POST /v1/query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsvQueryResponse {
    #[serde(default)]
    pub vulns: Vec<OsvVulnerability>,
}

/// OSV vulnerability entry.
#[derive(Debug, Clone, Deserialize)]
pub struct OsvVulnerability {
    /// Vulnerability ID (e.g., "GHSA-xxx", "CVE-xxx")
    pub id: String,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub details: Option<String>,

    /// Aliases (e.g., CVE IDs)
    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub severity: Vec<OsvSeverity>,

    #[serde(default)]
    pub references: Vec<OsvReference>,

    /// Database-specific fields; GitHub advisories carry a `severity` label here
    #[serde(default)]
    pub database_specific: Option<serde_json::Value>,
}

/// OSV severity information.
#[derive(Debug, Clone, Deserialize)]
pub struct OsvSeverity {
    /// Severity type (e.g., "CVSS_V3")
    #[serde(rename = "type")]
    pub severity_type: String,

    /// Score or vector string
    pub score: String,
}

/// Reference link.
#[derive(Debug, Clone, Deserialize)]
pub struct OsvReference {
    #[serde(rename = "type", default)]
    pub ref_type: Option<String>,

    pub url: String,
}
