//! "Latest known version" strategies.
//!
//! Every library gets its latest version from exactly one strategy: the
//! release catalog by default, or a library-specific upstream lookup
//! (source-control tags, a changelog page) registered by name. This answer
//! is independent of the security classification and may disagree with
//! it; both are surfaced side by side.

#[cfg(feature = "enrichment")]
mod changelog;
#[cfg(feature = "enrichment")]
mod github;

#[cfg(feature = "enrichment")]
pub use changelog::ChangelogLatest;
#[cfg(feature = "enrichment")]
pub use github::GitHubTagsLatest;

use crate::catalog::ReleaseCatalog;
use crate::config::LatestSourceConfig;
use crate::error::{full_message, Result};
use crate::model::LatestVersion;
use crate::resolve::{canonical_key, normalize};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Provenance tag of the catalog strategy.
pub const CATALOG_SOURCE: &str = "catalog";

/// A strategy that answers "what is the newest version of this library?".
pub trait LatestVersionSource: Send + Sync {
    /// Provenance tag reported alongside the answer.
    fn provenance(&self) -> String;

    /// Newest version, normalized; `Ok(None)` when the source has no answer.
    fn latest_version(&self, name: &str) -> Result<Option<String>>;
}

/// Latest version as reported by the local release catalog.
pub struct CatalogLatest {
    catalog: Arc<dyn ReleaseCatalog>,
}

impl CatalogLatest {
    #[must_use]
    pub fn new(catalog: Arc<dyn ReleaseCatalog>) -> Self {
        Self { catalog }
    }
}

impl LatestVersionSource for CatalogLatest {
    fn provenance(&self) -> String {
        CATALOG_SOURCE.to_string()
    }

    fn latest_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .catalog
            .latest_known_version(name)
            .as_known()
            .map(str::to_string))
    }
}

/// A latest-version answer with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestAnswer {
    pub version: LatestVersion,
    pub source: String,
}

/// Per-library strategy table with a catalog fallback.
pub struct LatestSourceRegistry {
    fallback: Box<dyn LatestVersionSource>,
    /// Lowercased library name -> strategy
    sources: IndexMap<String, Box<dyn LatestVersionSource>>,
}

impl LatestSourceRegistry {
    /// Registry answering every library from `fallback`.
    #[must_use]
    pub fn new(fallback: Box<dyn LatestVersionSource>) -> Self {
        Self {
            fallback,
            sources: IndexMap::new(),
        }
    }

    /// Registry answering every library from the catalog.
    #[must_use]
    pub fn catalog_only(catalog: Arc<dyn ReleaseCatalog>) -> Self {
        Self::new(Box::new(CatalogLatest::new(catalog)))
    }

    /// Build a registry from configured strategies.
    ///
    /// Strategies that need network access are skipped, with a warning,
    /// when the `enrichment` feature is disabled.
    pub fn from_config(
        catalog: Arc<dyn ReleaseCatalog>,
        strategies: &IndexMap<String, LatestSourceConfig>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut registry = Self::catalog_only(Arc::clone(&catalog));
        for (name, strategy) in strategies {
            match strategy {
                LatestSourceConfig::Catalog => {
                    registry.register(name, Box::new(CatalogLatest::new(Arc::clone(&catalog))));
                }
                #[cfg(feature = "enrichment")]
                LatestSourceConfig::GithubTags { repo, tag_pattern } => {
                    let source = GitHubTagsLatest::new(repo, tag_pattern.as_deref(), timeout)?;
                    registry.register(name, Box::new(source));
                }
                #[cfg(feature = "enrichment")]
                LatestSourceConfig::Changelog { url, pattern } => {
                    let source = ChangelogLatest::new(url, pattern.as_deref(), timeout)?;
                    registry.register(name, Box::new(source));
                }
                #[cfg(not(feature = "enrichment"))]
                other => {
                    let _ = timeout;
                    tracing::warn!(
                        "{}: latest-version strategy {:?} needs the 'enrichment' feature; using the catalog",
                        name,
                        other
                    );
                }
            }
        }
        Ok(registry)
    }

    /// Register a strategy for one library (case-insensitive).
    pub fn register(&mut self, name: &str, source: Box<dyn LatestVersionSource>) {
        self.sources.insert(name.to_lowercase(), source);
    }

    #[must_use]
    pub fn with_source(mut self, name: &str, source: Box<dyn LatestVersionSource>) -> Self {
        self.register(name, source);
        self
    }

    /// Ask the strategy registered for `name`.
    ///
    /// A failing strategy yields [`LatestVersion::NotDetermined`]; its
    /// provenance is still reported.
    #[must_use]
    pub fn lookup(&self, name: &str) -> LatestAnswer {
        let source = self
            .sources
            .get(&name.to_lowercase())
            .unwrap_or(&self.fallback);
        let provenance = source.provenance();

        let version = match source.latest_version(name) {
            Ok(found) => LatestVersion::from(found.map(|v| normalize(v.as_str()))),
            Err(e) => {
                tracing::warn!(
                    "{}: latest version lookup via {} failed: {}",
                    name,
                    provenance,
                    full_message(&e)
                );
                LatestVersion::NotDetermined
            }
        };

        LatestAnswer {
            version,
            source: provenance,
        }
    }
}

/// Extract version candidates from text with `pattern`.
///
/// Capture group 1 is used when the pattern has one, the whole match
/// otherwise.
#[must_use]
pub fn capture_versions(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Highest release-like version among `candidates`, normalized.
///
/// Candidates that do not start with a number (`main`, `latest`) are
/// ignored.
pub fn highest_version<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|c| normalize(c.as_ref()))
        .filter(|c| canonical_key(c.as_str()).is_numeric_release())
        .max_by_key(|c| canonical_key(c.as_str()))
}
