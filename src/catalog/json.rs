//! JSON-file release catalog.
//!
//! Document layout:
//!
//! ```json
//! {
//!   "libraries": [
//!     {
//!       "name": "FreeRTOS",
//!       "releases": [
//!         {"version": "V10.4.3", "release_date": "2020-12-15",
//!          "security": "1", "release_notes": "...", "cve": "CVE-2021-31571"}
//!       ]
//!     }
//!   ]
//! }
//! ```

use super::{InMemoryCatalog, ReleaseCatalog};
use crate::error::{CatalogErrorKind, CheckerError, ErrorContext, Result};
use crate::model::ReleaseRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub libraries: Vec<CatalogLibrary>,
}

/// One library entry in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLibrary {
    pub name: String,
    #[serde(default)]
    pub releases: Vec<ReleaseRecord>,
}

/// Release catalog loaded from a JSON document.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: Option<PathBuf>,
    inner: InMemoryCatalog,
}

impl JsonCatalog {
    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CheckerError::catalog(
                "loading catalog",
                CatalogErrorKind::NotFound(path.to_path_buf()),
            ));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CheckerError::io(path, e))?;
        let mut catalog =
            Self::parse(&content).with_context(|| format!("loading {}", path.display()))?;
        catalog.path = Some(path.to_path_buf());
        tracing::debug!(
            "Loaded release catalog {} ({} libraries)",
            path.display(),
            catalog.inner.len()
        );
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(content).map_err(|e| {
            CheckerError::catalog(
                "parsing catalog",
                CatalogErrorKind::InvalidDocument(e.to_string()),
            )
        })?;
        Self::from_document(document)
    }

    /// Build a catalog from an already-deserialized document.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        let mut inner = InMemoryCatalog::new();
        for library in document.libraries {
            let name = library.name.trim();
            if name.is_empty() {
                return Err(CheckerError::catalog(
                    "parsing catalog",
                    CatalogErrorKind::InvalidDocument("library with empty name".to_string()),
                ));
            }
            for release in &library.releases {
                warn_on_malformed_date(name, release);
            }
            inner.insert(name, library.releases);
        }
        Ok(Self { path: None, inner })
    }

    /// File the catalog was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Dates are ordered as raw ISO strings, so anything else sorts oddly.
fn warn_on_malformed_date(library: &str, release: &ReleaseRecord) {
    if let Some(date) = release.date() {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            tracing::warn!(
                "{} {}: release date '{}' is not an ISO date; ordering may be off",
                library,
                release.version,
                date
            );
        }
    }
}

impl ReleaseCatalog for JsonCatalog {
    fn releases_for_library(&self, name: &str) -> Vec<ReleaseRecord> {
        self.inner.releases_for_library(name)
    }

    fn library_names(&self) -> Vec<String> {
        self.inner.library_names()
    }
}
