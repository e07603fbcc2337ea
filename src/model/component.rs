//! Library identities extracted from an SBOM.

use serde::{Deserialize, Serialize};

/// A monitored library as declared by an SBOM entry.
///
/// Created once per SBOM entry by the readers in [`crate::parsers`] and read
/// only by the reconciliation core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryComponent {
    /// Canonical library key (e.g. `FreeRTOS`)
    pub name: String,
    /// Version string exactly as declared, possibly with a `v`/`V` prefix
    #[serde(rename = "version")]
    pub declared_version: String,
    /// Package URL, when the SBOM carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    /// CPE 2.3 name, when the SBOM carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
    /// Reference URLs in SBOM order, used as vulnerability-source hints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl LibraryComponent {
    /// Create a component with only a name and declared version.
    #[must_use]
    pub fn new(name: impl Into<String>, declared_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_version: declared_version.into(),
            purl: None,
            cpe: None,
            references: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self
    }

    #[must_use]
    pub fn with_cpe(mut self, cpe: impl Into<String>) -> Self {
        self.cpe = Some(cpe.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }
}
