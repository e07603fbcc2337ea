//! **Firmware SBOM update and vulnerability checking.**
//!
//! `fw-sbom-checker` reads the firmware libraries declared in an SBOM
//! (CycloneDX JSON or SPDX tag-value), reconciles each declared version
//! against a catalog of known releases, and tells you whether a later
//! release fixed a security issue. Optionally, it asks public vulnerability
//! feeds (OSV, NVD) what is known about the declared version.
//!
//! ## Key Features
//!
//! - **Version resolution**: `v`-prefix tolerant normalization and a
//!   canonical numeric/text key for ordering and equality.
//! - **Release history**: date-then-version ordering with undated releases
//!   last, and detection of duplicate catalog entries.
//! - **Security classification**: `up-to-date` / `needs-update` / `unknown`,
//!   with the security release notes published after the declared version.
//! - **Latest version**: per-library strategies (catalog, GitHub tags,
//!   changelog page), reported with their provenance.
//! - **Vulnerability lookup**: ordered query plans (purl, ecosystem package,
//!   CPE, free text) with best-effort fallback and per-run memoization.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`LibraryComponent`] in, [`ResolvedLibrary`] out.
//! - **[`resolve`]**: the pure resolution core.
//! - **[`catalog`]**: the [`ReleaseCatalog`] trait and its implementations.
//! - **[`latest`]**: latest-version strategies.
//! - **[`enrichment`]**: query planning, aggregation, and the OSV / NVD
//!   providers (the latter behind the `enrichment` feature).
//! - **[`pipeline`]**: the [`Reconciler`] tying it all together.
//! - **[`parsers`]** and **[`reports`]**: SBOM input and report output.
//!
//! ## Getting Started
//!
//! ```
//! use std::sync::Arc;
//! use fw_sbom_checker::catalog::InMemoryCatalog;
//! use fw_sbom_checker::model::{LibraryComponent, ReleaseRecord, Status};
//! use fw_sbom_checker::Reconciler;
//!
//! let catalog = InMemoryCatalog::new().with_library(
//!     "FreeRTOS",
//!     vec![
//!         ReleaseRecord::new("V10.4.3").with_date("2020-12-15"),
//!         ReleaseRecord::new("V10.4.4").with_date("2021-05-28").with_security("1"),
//!     ],
//! );
//!
//! let reconciler = Reconciler::new(Arc::new(catalog));
//! let results = reconciler.reconcile(&[LibraryComponent::new("FreeRTOS", "v10.4.3")]);
//!
//! assert_eq!(results[0].status, Status::NeedsUpdate);
//! assert_eq!(results[0].latest_version.to_string(), "10.4.4");
//! ```
//!
//! ## Feature Flags
//!
//! - `enrichment` (default): HTTP providers (OSV, NVD) and the HTTP
//!   latest-version strategies. Adds the `reqwest` dependency. Without it,
//!   planning, aggregation and reconciliation still work with your own
//!   [`VulnerabilityProvider`] and [`LatestVersionSource`] implementations.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod latest;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;
pub mod resolve;

// Re-export main types for convenience
pub use catalog::{InMemoryCatalog, JsonCatalog, ReleaseCatalog};
#[cfg(feature = "sqlite")]
pub use catalog::SqliteCatalog;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, EnrichmentConfig, Validatable};
pub use enrichment::{QueryPlanner, VulnerabilityAggregator, VulnerabilityProvider};
pub use error::{CheckerError, ErrorContext, Result};
pub use latest::{LatestSourceRegistry, LatestVersionSource};
pub use model::{LibraryComponent, ReleaseRecord, ResolvedLibrary, SecurityLabel, Status};
pub use parsers::{read_components, LibraryFilter};
pub use pipeline::{Reconciler, RunSummary};
pub use reports::{ReportFormat, ReportGenerator};
