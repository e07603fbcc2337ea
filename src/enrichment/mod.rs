//! Vulnerability lookup: query planning, provider aggregation and the
//! concrete OSV / NVD providers.
//!
//! # Example
//!
//! ```no_run
//! use fw_sbom_checker::enrichment::{OsvProvider, QueryPlanner, VulnerabilityAggregator};
//! use fw_sbom_checker::model::LibraryComponent;
//!
//! let osv = OsvProvider::new(Default::default()).unwrap();
//! let aggregator = VulnerabilityAggregator::new(QueryPlanner::default())
//!     .with_provider(Box::new(osv));
//!
//! let report = aggregator.scan(&LibraryComponent::new("FreeRTOS", "V10.4.3"));
//! println!("{} findings", report.total());
//! ```

pub mod aggregate;
mod cache;
#[cfg(feature = "enrichment")]
pub mod nvd;
#[cfg(feature = "enrichment")]
pub mod osv;
pub mod plan;
mod traits;

pub use aggregate::{aggregate_source, VulnerabilityAggregator};
pub use cache::QueryCache;
#[cfg(feature = "enrichment")]
pub use nvd::{NvdClientConfig, NvdProvider};
#[cfg(feature = "enrichment")]
pub use osv::{OsvClientConfig, OsvProvider};
pub use plan::{KnownRef, KnownRefs, QueryDescriptor, QueryPlanner, QueryTarget};
pub use traits::VulnerabilityProvider;

use crate::config::EnrichmentConfig;
use crate::error::Result;

/// Build the providers enabled in `config`, in report order (OSV, then NVD).
#[cfg(feature = "enrichment")]
pub fn build_providers(config: &EnrichmentConfig) -> Result<Vec<Box<dyn VulnerabilityProvider>>> {
    let mut providers: Vec<Box<dyn VulnerabilityProvider>> = Vec::new();
    if config.osv {
        providers.push(Box::new(OsvProvider::new(OsvClientConfig {
            api_base: config.osv_api_base.clone(),
            timeout: config.timeout(),
        })?));
    }
    if config.nvd {
        providers.push(Box::new(NvdProvider::new(NvdClientConfig {
            api_base: config.nvd_api_base.clone(),
            timeout: config.timeout(),
            max_results: config.nvd_max_results,
        })?));
    }
    Ok(providers)
}

/// Without the `enrichment` feature no network provider is compiled in.
#[cfg(not(feature = "enrichment"))]
pub fn build_providers(config: &EnrichmentConfig) -> Result<Vec<Box<dyn VulnerabilityProvider>>> {
    if config.osv || config.nvd {
        tracing::warn!("vulnerability lookups need the 'enrichment' feature; skipping");
    }
    Ok(Vec::new())
}

#[cfg(feature = "enrichment")]
pub(crate) use http::{api_error, http_client, invalid_response, network_error};

#[cfg(feature = "enrichment")]
mod http {
    use crate::error::{CheckerError, EnrichmentErrorKind, Result};
    use reqwest::blocking::Client;
    use std::fmt::Display;
    use std::time::Duration;

    /// Blocking client shared by every provider and upstream lookup.
    pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("Failed to create HTTP client", e))
    }

    pub(crate) fn network_error(msg: &str, err: reqwest::Error) -> CheckerError {
        CheckerError::enrichment(msg, EnrichmentErrorKind::NetworkError(err.to_string()))
    }

    pub(crate) fn api_error(msg: impl Into<String>) -> CheckerError {
        CheckerError::enrichment("API request", EnrichmentErrorKind::ApiError(msg.into()))
    }

    pub(crate) fn invalid_response(msg: &str, err: impl Display) -> CheckerError {
        CheckerError::enrichment(msg, EnrichmentErrorKind::InvalidResponse(err.to_string()))
    }
}
