//! Mapper from OSV responses to [`VulnerabilityRecord`].

use super::response::OsvVulnerability;
use crate::model::VulnerabilityRecord;

/// Source tag for OSV findings.
pub const OSV_SOURCE: &str = "OSV";

/// Map an OSV vulnerability to a finding.
pub fn map_osv_record(osv: &OsvVulnerability) -> VulnerabilityRecord {
    let summary = osv
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| osv.details.as_deref().and_then(|d| d.lines().next()))
        .unwrap_or_default();

    let mut record = VulnerabilityRecord::new(osv.id.clone(), OSV_SOURCE).with_summary(summary.trim());
    if let Some(severity) = extract_severity(osv) {
        record = record.with_severity(severity);
    }
    record.references = osv.references.iter().map(|r| r.url.clone()).collect();
    record
}

/// The advisory's own severity label, else the first scored entry.
fn extract_severity(osv: &OsvVulnerability) -> Option<String> {
    osv.database_specific
        .as_ref()
        .and_then(|db| db.get("severity"))
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| osv.severity.first().map(|s| s.score.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OsvVulnerability {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_with_database_severity() {
        let osv = parse(
            r#"{
                "id": "GHSA-abcd-1234",
                "summary": "Heap overflow in FreeRTOS+TCP",
                "severity": [{"type": "CVSS_V3", "score": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"}],
                "references": [{"type": "ADVISORY", "url": "https://nvd.nist.gov/vuln/detail/CVE-2021-31571"}],
                "database_specific": {"severity": "CRITICAL"}
            }"#,
        );
        let record = map_osv_record(&osv);
        assert_eq!(record.id, "GHSA-abcd-1234");
        assert_eq!(record.source, "OSV");
        assert_eq!(record.severity.as_deref(), Some("CRITICAL"));
        assert_eq!(record.references.len(), 1);
    }

    #[test]
    fn test_map_falls_back_to_score_and_details() {
        let osv = parse(
            r#"{
                "id": "OSV-2023-1",
                "details": "First line.\nMore text.",
                "severity": [{"type": "CVSS_V3", "score": "7.5"}]
            }"#,
        );
        let record = map_osv_record(&osv);
        assert_eq!(record.summary, "First line.");
        assert_eq!(record.severity.as_deref(), Some("7.5"));
        assert!(record.references.is_empty());
    }
}
