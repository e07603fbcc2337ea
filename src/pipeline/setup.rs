//! Building a [`Reconciler`] from configuration.

use super::Reconciler;
#[cfg(feature = "sqlite")]
use crate::catalog::SqliteCatalog;
use crate::catalog::{JsonCatalog, ReleaseCatalog};
use crate::config::{AppConfig, DEFAULT_CATALOG_FILE};
#[cfg(not(feature = "sqlite"))]
use crate::error::{CatalogErrorKind, CheckerError};
use crate::error::Result as CheckerResult;
use crate::enrichment::{build_providers, KnownRefs, QueryPlanner, VulnerabilityAggregator};
use crate::latest::LatestSourceRegistry;
use crate::parsers::LibraryFilter;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog path from config, or `releases.json` in the working directory.
#[must_use]
pub fn catalog_path(config: &AppConfig) -> PathBuf {
    config
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
}

/// Extensions read as SQLite databases; anything else is a JSON document.
const DATABASE_EXTENSIONS: [&str; 3] = ["db", "sqlite", "sqlite3"];

fn is_database_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DATABASE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Load the configured release catalog, choosing the backend by extension.
pub fn load_catalog(config: &AppConfig) -> Result<Arc<dyn ReleaseCatalog>> {
    let path = catalog_path(config);
    let catalog = if is_database_path(&path) {
        open_database_catalog(&path)
    } else {
        JsonCatalog::load(&path).map(|c| Arc::new(c) as Arc<dyn ReleaseCatalog>)
    };
    catalog.with_context(|| format!("Failed to load release catalog: {}", path.display()))
}

#[cfg(feature = "sqlite")]
fn open_database_catalog(path: &Path) -> CheckerResult<Arc<dyn ReleaseCatalog>> {
    Ok(Arc::new(SqliteCatalog::open(path)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_database_catalog(path: &Path) -> CheckerResult<Arc<dyn ReleaseCatalog>> {
    Err(CheckerError::catalog(
        format!("loading {}", path.display()),
        CatalogErrorKind::Unsupported("rebuild with the `sqlite` feature".to_string()),
    ))
}

/// Filter for the configured monitored libraries.
#[must_use]
pub fn library_filter(config: &AppConfig) -> LibraryFilter {
    LibraryFilter::new(config.monitored_libraries.iter().cloned())
}

/// Vulnerability scanner for the configured sources, if scanning is on.
pub fn build_scanner(config: &AppConfig) -> Result<Option<VulnerabilityAggregator>> {
    if !config.enrichment.enabled {
        return Ok(None);
    }

    let known = KnownRefs::builtin().with_overrides(&config.known_refs);
    let providers =
        build_providers(&config.enrichment).context("Failed to set up vulnerability sources")?;
    if providers.is_empty() {
        tracing::warn!("Vulnerability scanning enabled but no source is available");
        return Ok(None);
    }

    Ok(Some(
        VulnerabilityAggregator::new(QueryPlanner::new(known)).with_providers(providers),
    ))
}

/// Assemble a reconciler around an already loaded catalog.
pub fn build_reconciler_with(
    config: &AppConfig,
    catalog: Arc<dyn ReleaseCatalog>,
) -> Result<Reconciler> {
    let latest = LatestSourceRegistry::from_config(
        Arc::clone(&catalog),
        &config.latest_sources,
        config.enrichment.timeout(),
    )
    .context("Failed to set up latest-version sources")?;

    let mut reconciler = Reconciler::new(catalog).with_latest_sources(latest);
    if let Some(scanner) = build_scanner(config)? {
        tracing::debug!("Vulnerability scanning with {} sources", scanner.provider_count());
        reconciler = reconciler.with_scanner(scanner);
    }
    Ok(reconciler)
}

/// Validate the config, load the catalog and assemble a reconciler.
pub fn build_reconciler(config: &AppConfig) -> Result<Reconciler> {
    config.ensure_valid().context("Invalid configuration")?;
    let catalog = load_catalog(config)?;
    build_reconciler_with(config, catalog)
}
