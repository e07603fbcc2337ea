//! In-memory memoization of vulnerability lookups for one run.

use crate::model::VulnerabilityReport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Cache key: exact library name and normalized version.
pub type QueryKey = (String, String);

/// Process-lifetime cache of vulnerability reports.
///
/// No expiry: the tool is not long-running. The map sits behind a mutex so
/// a shared aggregator stays sound if components are resolved in parallel.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, VulnerabilityReport>>,
    hits: AtomicUsize,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, VulnerabilityReport>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, name: &str, version: &str) -> Option<VulnerabilityReport> {
        let found = self
            .lock()
            .get(&(name.to_string(), version.to_string()))
            .cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn insert(&self, name: &str, version: &str, report: VulnerabilityReport) {
        self.lock()
            .insert((name.to_string(), version.to_string()), report);
    }

    /// Cached report for the key, computing and storing it on a miss.
    ///
    /// The lock is not held while `compute` runs.
    pub fn get_or_insert_with<F>(&self, name: &str, version: &str, compute: F) -> VulnerabilityReport
    where
        F: FnOnce() -> VulnerabilityReport,
    {
        if let Some(report) = self.get(name, version) {
            return report;
        }
        let report = compute();
        self.insert(name, version, report.clone());
        report
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of lookups answered from the cache.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFindings;

    fn report(source: &str) -> VulnerabilityReport {
        VulnerabilityReport {
            sources: vec![SourceFindings {
                source: source.to_string(),
                vulns: vec![],
                query: Some("name 'FreeRTOS'".to_string()),
                error: None,
            }],
        }
    }

    #[test]
    fn test_compute_once_per_key() {
        let cache = QueryCache::new();
        let mut calls = 0;
        let first = cache.get_or_insert_with("FreeRTOS", "10.4.3", || {
            calls += 1;
            report("OSV")
        });
        let second = cache.get_or_insert_with("FreeRTOS", "10.4.3", || {
            calls += 1;
            report("NVD")
        });
        assert_eq!(calls, 1);
        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_key_is_exact() {
        let cache = QueryCache::new();
        cache.insert("FreeRTOS", "10.4.3", report("OSV"));
        assert!(cache.get("freertos", "10.4.3").is_none());
        assert!(cache.get("FreeRTOS", "10.4.4").is_none());
        assert_eq!(cache.len(), 1);
    }
}
