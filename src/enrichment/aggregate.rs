//! Vulnerability aggregation across query attempts and sources.

use super::cache::QueryCache;
use super::plan::{QueryDescriptor, QueryPlanner};
use super::traits::VulnerabilityProvider;
use crate::error::full_message;
use crate::model::{dedup_records, LibraryComponent, SourceFindings, VulnerabilityReport};
use crate::resolve::normalize;
use std::collections::HashSet;

/// Run `plan` against one provider.
///
/// Attempts the provider cannot run are dropped first; of the remaining
/// ones, an attempt asking for the same payload as an earlier one is
/// skipped. Attempts run in order and the first non-empty answer wins. A failed
/// attempt moves on to the next one. When nothing is found, the last
/// successful empty answer is reported; when every attempt failed, the
/// first attempt's label and the last error are.
pub fn aggregate_source(provider: &dyn VulnerabilityProvider, plan: &[QueryDescriptor]) -> SourceFindings {
    let source = provider.name().to_string();
    let mut seen = HashSet::new();
    let attempts: Vec<&QueryDescriptor> = plan
        .iter()
        .filter(|attempt| provider.supports(&attempt.target))
        .filter(|attempt| seen.insert(attempt.identity()))
        .collect();

    let mut last_error: Option<String> = None;
    let mut best_empty: Option<&QueryDescriptor> = None;

    for attempt in &attempts {
        tracing::debug!("{}: querying {} @ {}", source, attempt.label, attempt.version);
        match provider.query(attempt) {
            Ok(records) => {
                let vulns: Vec<_> = dedup_records(records)
                    .into_iter()
                    .map(|mut record| {
                        if record.source.is_empty() {
                            record.source.clone_from(&source);
                        }
                        record
                    })
                    .collect();
                if !vulns.is_empty() {
                    return SourceFindings {
                        source,
                        vulns,
                        query: Some(attempt.label.clone()),
                        error: None,
                    };
                }
                best_empty = Some(attempt);
            }
            Err(e) => {
                let message = full_message(&e);
                tracing::debug!("{}: {} failed: {}", source, attempt.label, message);
                last_error = Some(message);
            }
        }
    }

    if let Some(attempt) = best_empty {
        return SourceFindings {
            source,
            vulns: Vec::new(),
            query: Some(attempt.label.clone()),
            error: None,
        };
    }

    if let Some(error) = &last_error {
        tracing::warn!("{}: every query attempt failed: {}", source, error);
    }
    SourceFindings {
        source,
        vulns: Vec::new(),
        query: attempts.first().map(|attempt| attempt.label.clone()),
        error: last_error,
    }
}

/// Queries every configured provider for a library and memoizes the result.
pub struct VulnerabilityAggregator {
    planner: QueryPlanner,
    providers: Vec<Box<dyn VulnerabilityProvider>>,
    cache: QueryCache,
}

impl VulnerabilityAggregator {
    #[must_use]
    pub fn new(planner: QueryPlanner) -> Self {
        Self {
            planner,
            providers: Vec::new(),
            cache: QueryCache::new(),
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn VulnerabilityProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    #[must_use]
    pub fn with_providers(mut self, providers: Vec<Box<dyn VulnerabilityProvider>>) -> Self {
        self.providers.extend(providers);
        self
    }

    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Findings for `component`, one entry per provider in registration order.
    ///
    /// Results are concatenated without cross-source deduplication.
    #[must_use]
    pub fn scan(&self, component: &LibraryComponent) -> VulnerabilityReport {
        let version = normalize(component.declared_version.as_str());
        self.cache
            .get_or_insert_with(&component.name, &version, || {
                let plan = self.planner.plan(component, &version);
                VulnerabilityReport {
                    sources: self
                        .providers
                        .iter()
                        .map(|provider| aggregate_source(provider.as_ref(), &plan))
                        .collect(),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::plan::{build_plan, QueryTarget};
    use crate::error::{CheckerError, EnrichmentErrorKind, Result};
    use crate::model::VulnerabilityRecord;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers by label; labels not listed fail with a network error.
    struct Scripted {
        answers: HashMap<String, Vec<VulnerabilityRecord>>,
        calls: AtomicUsize,
        skip_purls: bool,
    }

    impl Scripted {
        fn new(answers: &[(&str, Vec<VulnerabilityRecord>)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(label, vulns)| ((*label).to_string(), vulns.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
                skip_purls: false,
            }
        }
    }

    impl VulnerabilityProvider for Scripted {
        fn name(&self) -> &str {
            "OSV"
        }

        fn supports(&self, target: &QueryTarget) -> bool {
            !(self.skip_purls && matches!(target, QueryTarget::Purl { .. }))
        }

        fn query(&self, query: &QueryDescriptor) -> Result<Vec<VulnerabilityRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers.get(&query.label).cloned().ok_or_else(|| {
                CheckerError::enrichment(
                    "querying",
                    EnrichmentErrorKind::NetworkError("connection refused".to_string()),
                )
            })
        }
    }

    fn cve(id: &str) -> VulnerabilityRecord {
        VulnerabilityRecord::new(id, "OSV")
    }

    fn freertos_plan() -> Vec<QueryDescriptor> {
        let component = LibraryComponent::new("FreeRTOS", "10.4.3")
            .with_purl("pkg:github/FreeRTOS/FreeRTOS-Kernel@V10.4.3")
            .with_reference("https://github.com/FreeRTOS/FreeRTOS-Kernel");
        build_plan(&component, "10.4.3", None)
    }

    #[test]
    fn test_first_non_empty_wins() {
        let provider = Scripted::new(&[
            ("purl pkg:github/FreeRTOS/FreeRTOS-Kernel@V10.4.3", vec![]),
            (
                "GitHub::FreeRTOS/FreeRTOS-Kernel",
                vec![cve("CVE-2021-31571"), cve("CVE-2021-31572")],
            ),
            ("name 'FreeRTOS'", vec![cve("CVE-2099-0001")]),
        ]);
        let findings = aggregate_source(&provider, &freertos_plan());
        assert_eq!(findings.vulns.len(), 2);
        assert_eq!(
            findings.query.as_deref(),
            Some("GitHub::FreeRTOS/FreeRTOS-Kernel")
        );
        assert!(findings.error.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_success_beats_errors() {
        let provider = Scripted::new(&[("GitHub::FreeRTOS/FreeRTOS-Kernel", vec![])]);
        let findings = aggregate_source(&provider, &freertos_plan());
        assert!(findings.vulns.is_empty());
        assert_eq!(
            findings.query.as_deref(),
            Some("GitHub::FreeRTOS/FreeRTOS-Kernel")
        );
        assert!(findings.error.is_none());
    }

    #[test]
    fn test_all_failed_reports_first_label_and_error() {
        let provider = Scripted::new(&[]);
        let findings = aggregate_source(&provider, &freertos_plan());
        assert!(findings.vulns.is_empty());
        assert_eq!(
            findings.query.as_deref(),
            Some("purl pkg:github/FreeRTOS/FreeRTOS-Kernel@V10.4.3")
        );
        assert!(findings.error.as_deref().is_some_and(|e| e.contains("connection refused")));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsupported_targets_are_skipped() {
        let mut provider = Scripted::new(&[]);
        provider.skip_purls = true;
        let findings = aggregate_source(&provider, &freertos_plan());
        assert_eq!(
            findings.query.as_deref(),
            Some("GitHub::FreeRTOS/FreeRTOS-Kernel")
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_equivalent_attempts_run_once_per_source() {
        // purl pkg:github/FreeRTOS/FreeRTOS-Kernel and GitHub::FreeRTOS/FreeRTOS-Kernel
        let plan = QueryPlanner::default().plan(&LibraryComponent::new("FreeRTOS", "10.4.3"), "10.4.3");
        assert_eq!(plan.len(), 3);

        let provider = Scripted::new(&[]);
        let findings = aggregate_source(&provider, &plan);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            findings.query.as_deref(),
            Some("purl pkg:github/FreeRTOS/FreeRTOS-Kernel")
        );

        let mut no_purls = Scripted::new(&[("GitHub::FreeRTOS/FreeRTOS-Kernel", vec![cve("CVE-2021-31571")])]);
        no_purls.skip_purls = true;
        let findings = aggregate_source(&no_purls, &plan);
        assert_eq!(findings.vulns.len(), 1);
        assert_eq!(
            findings.query.as_deref(),
            Some("GitHub::FreeRTOS/FreeRTOS-Kernel")
        );
    }

    #[test]
    fn test_duplicates_within_source_collapse() {
        let provider = Scripted::new(&[(
            "name 'FatFs'",
            vec![cve("CVE-2022-0001"), cve("CVE-2022-0001"), cve("CVE-2022-0002")],
        )]);
        let plan = build_plan(&LibraryComponent::new("FatFs", "R0.15"), "R0.15", None);
        let findings = aggregate_source(&provider, &plan);
        let ids: Vec<_> = findings.vulns.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["CVE-2022-0001", "CVE-2022-0002"]);
    }

    #[test]
    fn test_scan_memoizes_by_name_and_version() {
        let aggregator = VulnerabilityAggregator::new(QueryPlanner::new(Default::default()))
            .with_provider(Box::new(Scripted::new(&[("name 'FatFs'", vec![cve("CVE-1")])])));
        let component = LibraryComponent::new("FatFs", "R0.15");
        let first = aggregator.scan(&component);
        let second = aggregator.scan(&component);
        assert_eq!(first, second);
        assert_eq!(first.total(), 1);
        assert_eq!(aggregator.cache().hits(), 1);
    }
}
