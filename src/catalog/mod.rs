//! Release-history catalog.
//!
//! The catalog is a read-only store of known releases per library. The
//! reconciliation core only needs the [`ReleaseCatalog`] trait; two
//! implementations are provided:
//!
//! - [`InMemoryCatalog`] for embedding and tests
//! - [`JsonCatalog`] backed by a JSON document on disk
//! - `SqliteCatalog` backed by a SQLite database (`sqlite` feature)

mod json;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use json::{CatalogDocument, CatalogLibrary, JsonCatalog};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCatalog;

use crate::model::{LatestVersion, ReleaseRecord};
use crate::resolve::{normalize, sort_releases};
use indexmap::IndexMap;

/// Read access to the release history of libraries.
///
/// Lookups are case-insensitive and never fail: an unknown library, or a
/// backing store that cannot be read, yields an empty history.
pub trait ReleaseCatalog: Send + Sync {
    /// All catalogued releases of a library, in no particular order.
    fn releases_for_library(&self, name: &str) -> Vec<ReleaseRecord>;

    /// Names of every catalogued library.
    fn library_names(&self) -> Vec<String>;

    /// Newest catalogued version of a library, normalized.
    fn latest_known_version(&self, name: &str) -> LatestVersion {
        sort_releases(self.releases_for_library(name))
            .last()
            .map_or(LatestVersion::NotDetermined, |r| {
                LatestVersion::from(normalize(r.version.as_str()))
            })
    }
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// Lowercased name -> (display name, releases)
    libraries: IndexMap<String, (String, Vec<ReleaseRecord>)>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a library, appending to any releases already catalogued under the
    /// same name.
    #[must_use]
    pub fn with_library(mut self, name: &str, releases: Vec<ReleaseRecord>) -> Self {
        self.insert(name, releases);
        self
    }

    pub fn insert(&mut self, name: &str, releases: Vec<ReleaseRecord>) {
        self.libraries
            .entry(name.to_lowercase())
            .or_insert_with(|| (name.to_string(), Vec::new()))
            .1
            .extend(releases);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

impl ReleaseCatalog for InMemoryCatalog {
    fn releases_for_library(&self, name: &str) -> Vec<ReleaseRecord> {
        self.libraries
            .get(&name.to_lowercase())
            .map(|(_, releases)| releases.clone())
            .unwrap_or_default()
    }

    fn library_names(&self) -> Vec<String> {
        self.libraries
            .values()
            .map(|(display, _)| display.clone())
            .collect()
    }
}
