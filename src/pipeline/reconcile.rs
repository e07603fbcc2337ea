//! Per-library reconciliation of SBOM declarations against the catalog.

use crate::catalog::ReleaseCatalog;
use crate::enrichment::VulnerabilityAggregator;
use crate::latest::LatestSourceRegistry;
use crate::model::{LibraryComponent, ResolvedLibrary, Status};
use crate::resolve::{classify, normalize, resolve};
use std::sync::Arc;

/// Resolves SBOM libraries against release history, latest-version
/// strategies and, optionally, vulnerability sources.
///
/// Every collaborator is owned by the reconciler; nothing is shared through
/// globals, so independent reconcilers can run side by side.
pub struct Reconciler {
    catalog: Arc<dyn ReleaseCatalog>,
    latest: LatestSourceRegistry,
    scanner: Option<VulnerabilityAggregator>,
}

impl Reconciler {
    /// Reconciler answering "latest" from the catalog, without vulnerability
    /// scanning.
    #[must_use]
    pub fn new(catalog: Arc<dyn ReleaseCatalog>) -> Self {
        let latest = LatestSourceRegistry::catalog_only(Arc::clone(&catalog));
        Self {
            catalog,
            latest,
            scanner: None,
        }
    }

    #[must_use]
    pub fn with_latest_sources(mut self, latest: LatestSourceRegistry) -> Self {
        self.latest = latest;
        self
    }

    #[must_use]
    pub fn with_scanner(mut self, scanner: VulnerabilityAggregator) -> Self {
        self.scanner = Some(scanner);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &dyn ReleaseCatalog {
        self.catalog.as_ref()
    }

    #[must_use]
    pub fn scanner(&self) -> Option<&VulnerabilityAggregator> {
        self.scanner.as_ref()
    }

    /// Reconcile every component, one result per input in input order.
    #[must_use]
    pub fn reconcile(&self, components: &[LibraryComponent]) -> Vec<ResolvedLibrary> {
        components.iter().map(|c| self.reconcile_one(c)).collect()
    }

    /// Reconcile a single component.
    ///
    /// Never fails: missing history, unknown versions and unreachable
    /// sources are reported through the status and the findings.
    #[must_use]
    pub fn reconcile_one(&self, component: &LibraryComponent) -> ResolvedLibrary {
        let current_version = normalize(component.declared_version.as_str());
        let releases = self.catalog.releases_for_library(&component.name);
        let history = resolve(releases, &component.declared_version);
        let classification = classify(&history);

        let latest = self.latest.lookup(&component.name);
        let vulnerabilities = self.scanner.as_ref().map(|s| s.scan(component));

        tracing::debug!(
            "{} {}: {} (latest {} via {})",
            component.name,
            current_version,
            classification.status,
            latest.version,
            latest.source
        );

        ResolvedLibrary {
            name: component.name.clone(),
            current_version,
            current_release_date: history.current().and_then(|r| r.date()).map(str::to_string),
            latest_version: latest.version,
            latest_release_date: history.latest().and_then(|r| r.date()).map(str::to_string),
            status: classification.status,
            security_label: classification.security_label,
            security_notes: classification.security_notes,
            source: latest.source,
            duplicate_versions: history.duplicate_versions().to_vec(),
            vulnerabilities,
        }
    }

    /// Summarize reconciled results.
    #[must_use]
    pub fn summary(results: &[ResolvedLibrary]) -> RunSummary {
        RunSummary::from_results(results)
    }
}

/// Counts over one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub libraries: usize,
    pub needs_update: usize,
    pub up_to_date: usize,
    pub unknown: usize,
    pub vulnerabilities: usize,
    /// Sources whose every query attempt failed
    pub failed_lookups: usize,
}

impl RunSummary {
    #[must_use]
    pub fn from_results(results: &[ResolvedLibrary]) -> Self {
        let mut summary = Self {
            libraries: results.len(),
            ..Self::default()
        };
        for lib in results {
            match lib.status {
                Status::NeedsUpdate => summary.needs_update += 1,
                Status::UpToDate => summary.up_to_date += 1,
                Status::Unknown => summary.unknown += 1,
            }
            summary.vulnerabilities += lib.vulnerability_count();
            summary.failed_lookups += lib
                .vulnerabilities
                .as_ref()
                .map_or(0, |r| r.failed_sources().count());
        }
        summary
    }

    #[must_use]
    pub const fn any_needs_update(&self) -> bool {
        self.needs_update > 0
    }

    pub fn log(&self, label: &str) {
        tracing::info!(
            "{}: {} libraries, {} need update, {} up to date, {} unknown",
            label,
            self.libraries,
            self.needs_update,
            self.up_to_date,
            self.unknown
        );
        if self.vulnerabilities > 0 || self.failed_lookups > 0 {
            tracing::info!(
                "{}: {} known vulnerabilities, {} failed lookups",
                label,
                self.vulnerabilities,
                self.failed_lookups
            );
        }
    }
}
