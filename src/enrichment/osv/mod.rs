//! OSV (Open Source Vulnerabilities) provider.
//!
//! See: <https://osv.dev>

mod client;
mod mapper;
pub mod response;

pub use client::{OsvClient, OsvClientConfig};
pub use mapper::{map_osv_record, OSV_SOURCE};

use crate::enrichment::plan::{QueryDescriptor, QueryTarget};
use crate::enrichment::traits::VulnerabilityProvider;
use crate::error::{CheckerError, EnrichmentErrorKind, Result};
use crate::model::VulnerabilityRecord;
use response::OsvQuery;

/// Vulnerability provider backed by `api.osv.dev`.
pub struct OsvProvider {
    client: OsvClient,
}

impl OsvProvider {
    pub fn new(config: OsvClientConfig) -> Result<Self> {
        Ok(Self {
            client: OsvClient::new(config)?,
        })
    }
}

/// Request body for a planned attempt, or `None` for shapes OSV cannot answer.
pub fn build_query(descriptor: &QueryDescriptor) -> Option<OsvQuery> {
    let version = descriptor.version.clone();
    match &descriptor.target {
        QueryTarget::Purl { purl } => {
            let version = descriptor.pinned_purl_version().is_none().then_some(version);
            Some(OsvQuery::from_purl(purl.clone(), version))
        }
        QueryTarget::Package { ecosystem, name } => Some(OsvQuery::from_package(
            name.clone(),
            Some(ecosystem.clone()),
            version,
        )),
        QueryTarget::Name { name } => Some(OsvQuery::from_package(name.clone(), None, version)),
        QueryTarget::Cpe { .. } => None,
    }
}

fn unsupported(descriptor: &QueryDescriptor) -> CheckerError {
    CheckerError::enrichment(
        format!("OSV query {}", descriptor.label),
        EnrichmentErrorKind::UnsupportedQuery("OSV has no lookup for this target".to_string()),
    )
}

impl VulnerabilityProvider for OsvProvider {
    fn name(&self) -> &str {
        OSV_SOURCE
    }

    fn supports(&self, target: &QueryTarget) -> bool {
        !matches!(target, QueryTarget::Cpe { .. })
    }

    fn query(&self, descriptor: &QueryDescriptor) -> Result<Vec<VulnerabilityRecord>> {
        let Some(query) = build_query(descriptor) else {
            return Err(unsupported(descriptor));
        };
        let vulns = self.client.query(&query)?;
        Ok(vulns.iter().map(map_osv_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pinned_purl_sent_alone() {
        let query = build_query(&QueryDescriptor::purl(
            "pkg:github/Mbed-TLS/mbedtls@v3.5.0",
            "3.5.0",
        ))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"package": {"purl": "pkg:github/Mbed-TLS/mbedtls@v3.5.0"}})
        );
    }

    #[test]
    fn test_query_shapes() {
        let purl = build_query(&QueryDescriptor::purl("pkg:github/OpenAMP/open-amp", "2023.04.0")).unwrap();
        assert_eq!(
            serde_json::to_value(&purl).unwrap(),
            json!({"package": {"purl": "pkg:github/OpenAMP/open-amp"}, "version": "2023.04.0"})
        );

        let package = build_query(&QueryDescriptor::package("GitHub", "FreeRTOS/FreeRTOS-Kernel", "10.4.3")).unwrap();
        assert_eq!(
            serde_json::to_value(&package).unwrap(),
            json!({"package": {"name": "FreeRTOS/FreeRTOS-Kernel", "ecosystem": "GitHub"}, "version": "10.4.3"})
        );

        let name = build_query(&QueryDescriptor::name("FatFs", "R0.15")).unwrap();
        assert_eq!(
            serde_json::to_value(&name).unwrap(),
            json!({"package": {"name": "FatFs"}, "version": "R0.15"})
        );

        assert!(build_query(&QueryDescriptor::cpe("cpe:2.3:a:x:y:1:*:*:*:*:*:*:*", "1")).is_none());
    }

    #[test]
    fn test_cpe_query_is_rejected_without_a_request() {
        let provider = OsvProvider::new(OsvClientConfig::default()).unwrap();
        let cpe = QueryDescriptor::cpe("cpe:2.3:a:x:y:1:*:*:*:*:*:*:*", "1");
        assert!(!provider.supports(&cpe.target));

        let err = provider.query(&cpe).unwrap_err();
        assert!(matches!(
            err,
            CheckerError::Enrichment {
                source: EnrichmentErrorKind::UnsupportedQuery(_),
                ..
            }
        ));
    }
}
