//! NVD (National Vulnerability Database) CVE provider.
//!
//! NVD has no package-URL lookups: purl attempts are skipped, package
//! attempts become keyword searches on the project name, and CPE attempts
//! use `cpeName`.

mod client;
pub mod response;

pub use client::{NvdClient, NvdClientConfig, NvdSearch};

use crate::enrichment::plan::{QueryDescriptor, QueryTarget};
use crate::enrichment::traits::VulnerabilityProvider;
use crate::error::{CheckerError, EnrichmentErrorKind, Result};
use crate::model::VulnerabilityRecord;
use response::NvdCve;

/// Source tag for NVD findings.
pub const NVD_SOURCE: &str = "NVD";

/// Vulnerability provider backed by the NVD CVE API.
pub struct NvdProvider {
    client: NvdClient,
}

impl NvdProvider {
    pub fn new(config: NvdClientConfig) -> Result<Self> {
        Ok(Self {
            client: NvdClient::new(config)?,
        })
    }
}

/// Search parameter for a planned attempt.
///
/// Package names are searched by their last path segment
/// (`FreeRTOS/FreeRTOS-Kernel` → `FreeRTOS-Kernel`).
pub fn build_search(descriptor: &QueryDescriptor) -> Option<NvdSearch> {
    let keyword = |term: &str| {
        let term = term.trim();
        if descriptor.version.is_empty() {
            NvdSearch::Keyword(term.to_string())
        } else {
            NvdSearch::Keyword(format!("{term} {}", descriptor.version))
        }
    };
    match &descriptor.target {
        QueryTarget::Name { name } => Some(keyword(name)),
        QueryTarget::Package { name, .. } => {
            let project = name
                .trim_end_matches(".git")
                .rsplit(['/', ':'])
                .find(|segment| !segment.is_empty())?;
            Some(keyword(project))
        }
        QueryTarget::Cpe { cpe } => Some(NvdSearch::CpeName(cpe.trim().to_string())),
        QueryTarget::Purl { .. } => None,
    }
}

fn map_nvd_record(cve: &NvdCve) -> VulnerabilityRecord {
    let mut record = VulnerabilityRecord::new(cve.id.clone(), NVD_SOURCE).with_summary(cve.summary());
    if let Some(severity) = cve.severity() {
        record = record.with_severity(severity);
    }
    record.references = cve.references.iter().map(|r| r.url.clone()).collect();
    record
}

fn unsupported(descriptor: &QueryDescriptor) -> CheckerError {
    CheckerError::enrichment(
        format!("NVD query {}", descriptor.label),
        EnrichmentErrorKind::UnsupportedQuery("NVD has no lookup for this target".to_string()),
    )
}

impl VulnerabilityProvider for NvdProvider {
    fn name(&self) -> &str {
        NVD_SOURCE
    }

    fn supports(&self, target: &QueryTarget) -> bool {
        !matches!(target, QueryTarget::Purl { .. })
    }

    fn query(&self, descriptor: &QueryDescriptor) -> Result<Vec<VulnerabilityRecord>> {
        let Some(search) = build_search(descriptor) else {
            return Err(unsupported(descriptor));
        };
        let response = self.client.search(&search)?;
        tracing::debug!(
            "NVD: {} of {} results for {}",
            response.vulnerabilities.len(),
            response.total_results,
            descriptor.label
        );
        Ok(response
            .vulnerabilities
            .iter()
            .filter(|item| !item.cve.id.is_empty())
            .map(|item| map_nvd_record(&item.cve))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::response::NvdResponse;
    use super::*;

    #[test]
    fn test_search_terms() {
        assert_eq!(
            build_search(&QueryDescriptor::name("FreeRTOS", "10.4.3")),
            Some(NvdSearch::Keyword("FreeRTOS 10.4.3".to_string()))
        );
        assert_eq!(
            build_search(&QueryDescriptor::package("GitHub", "FreeRTOS/FreeRTOS-Kernel", "10.4.3")),
            Some(NvdSearch::Keyword("FreeRTOS-Kernel 10.4.3".to_string()))
        );
        assert_eq!(
            build_search(&QueryDescriptor::package(
                "GIT",
                "https://git.savannah.nongnu.org/git/lwip.git",
                "2.1.2"
            )),
            Some(NvdSearch::Keyword("lwip 2.1.2".to_string()))
        );
        assert_eq!(
            build_search(&QueryDescriptor::cpe("cpe:2.3:a:arm:mbed_tls:3.5.0:*:*:*:*:*:*:*", "3.5.0")),
            Some(NvdSearch::CpeName("cpe:2.3:a:arm:mbed_tls:3.5.0:*:*:*:*:*:*:*".to_string()))
        );
        assert_eq!(
            build_search(&QueryDescriptor::purl("pkg:github/a/b", "1")),
            None
        );
    }

    #[test]
    fn test_purl_query_is_rejected_without_a_request() {
        let provider = NvdProvider::new(NvdClientConfig::default()).unwrap();
        let purl = QueryDescriptor::purl("pkg:github/OpenAMP/open-amp", "2023.04.0");
        assert!(!provider.supports(&purl.target));

        let err = provider.query(&purl).unwrap_err();
        assert!(matches!(
            err,
            CheckerError::Enrichment {
                source: EnrichmentErrorKind::UnsupportedQuery(_),
                ..
            }
        ));
    }

    #[test]
    fn test_map_response() {
        let response: NvdResponse = serde_json::from_str(
            r#"{
                "totalResults": 2,
                "vulnerabilities": [
                    {"cve": {
                        "id": "CVE-2021-31571",
                        "descriptions": [{"lang": "es", "value": "desbordamiento"}, {"lang": "en", "value": "Integer overflow in queue.c"}],
                        "references": [{"url": "https://github.com/FreeRTOS/FreeRTOS-Kernel/pull/224"}],
                        "metrics": {
                            "cvssMetricV2": [{"baseSeverity": "HIGH", "cvssData": {"baseScore": 7.5}}],
                            "cvssMetricV31": [{"cvssData": {"baseSeverity": "CRITICAL", "baseScore": 9.8}}]
                        }
                    }},
                    {"cve": {"id": "CVE-2021-0002", "metrics": {"cvssMetricV2": [{"baseSeverity": "MEDIUM"}]}}}
                ]
            }"#,
        )
        .unwrap();

        let records: Vec<_> = response
            .vulnerabilities
            .iter()
            .map(|item| map_nvd_record(&item.cve))
            .collect();
        assert_eq!(records[0].summary, "Integer overflow in queue.c");
        assert_eq!(records[0].severity.as_deref(), Some("CRITICAL"));
        assert_eq!(records[0].source, "NVD");
        assert_eq!(records[1].severity.as_deref(), Some("MEDIUM"));
        assert!(records[1].summary.is_empty());
    }
}
