//! Vulnerability findings and per-source provenance.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single finding reported by a vulnerability source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    /// Source-specific identifier (e.g. `CVE-2021-3420`, `GHSA-...`)
    pub id: String,
    #[serde(default)]
    pub summary: String,
    /// Originating feed
    pub source: String,
    /// Severity label or numeric score, in the feed's own terms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl VulnerabilityRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: String::new(),
            source: source.into(),
            severity: None,
            references: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }
}

/// Drop repeated findings, keeping first-seen order.
///
/// Records are keyed by `id`; records without an id are compared
/// structurally.
#[must_use]
pub fn dedup_records(records: Vec<VulnerabilityRecord>) -> Vec<VulnerabilityRecord> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut out: Vec<VulnerabilityRecord> = Vec::with_capacity(records.len());
    for record in records {
        if record.id.is_empty() {
            if !out.contains(&record) {
                out.push(record);
            }
        } else if seen_ids.insert(record.id.clone()) {
            out.push(record);
        }
    }
    out
}

/// Outcome of querying one source for one library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFindings {
    /// Source tag (e.g. `OSV`, `NVD`)
    pub source: String,
    pub vulns: Vec<VulnerabilityRecord>,
    /// Label of the query attempt that produced `vulns`
    pub query: Option<String>,
    /// Last transport error, set only when no attempt succeeded
    pub error: Option<String>,
}

impl SourceFindings {
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Findings for one library across every queried source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityReport {
    pub sources: Vec<SourceFindings>,
}

impl VulnerabilityReport {
    /// All findings, concatenated in source order.
    pub fn all_vulns(&self) -> impl Iterator<Item = &VulnerabilityRecord> {
        self.sources.iter().flat_map(|s| s.vulns.iter())
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.sources.iter().map(|s| s.vulns.len()).sum()
    }

    /// Sources for which every query attempt failed.
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceFindings> {
        self.sources.iter().filter(|s| s.has_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_by_id_keeps_first() {
        let records = vec![
            VulnerabilityRecord::new("CVE-1", "OSV").with_summary("first"),
            VulnerabilityRecord::new("CVE-2", "OSV"),
            VulnerabilityRecord::new("CVE-1", "OSV").with_summary("second"),
        ];
        let deduped = dedup_records(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].summary, "first");
    }

    #[test]
    fn test_dedup_without_id_is_structural() {
        let a = VulnerabilityRecord::new("", "NVD").with_summary("a");
        let b = VulnerabilityRecord::new("", "NVD").with_summary("b");
        let deduped = dedup_records(vec![a.clone(), b, a]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_report_totals() {
        let report = VulnerabilityReport {
            sources: vec![
                SourceFindings {
                    source: "OSV".into(),
                    vulns: vec![VulnerabilityRecord::new("X-1", "OSV")],
                    query: Some("purl pkg:github/a/b".into()),
                    error: None,
                },
                SourceFindings {
                    source: "NVD".into(),
                    vulns: Vec::new(),
                    query: Some("name 'b'".into()),
                    error: Some("timeout".into()),
                },
            ],
        };
        assert_eq!(report.total(), 1);
        assert_eq!(report.failed_sources().count(), 1);
    }
}
