//! NVD CVE API 2.0 response types (the subset we read).

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdResponse {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub vulnerabilities: Vec<NvdItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NvdItem {
    pub cve: NvdCve,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NvdCve {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub descriptions: Vec<NvdDescription>,
    #[serde(default)]
    pub references: Vec<NvdReference>,
    #[serde(default)]
    pub metrics: NvdMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NvdDescription {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NvdReference {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NvdMetrics {
    #[serde(default, rename = "cvssMetricV31")]
    pub v31: Vec<NvdMetric>,
    #[serde(default, rename = "cvssMetricV30")]
    pub v30: Vec<NvdMetric>,
    #[serde(default, rename = "cvssMetricV2")]
    pub v2: Vec<NvdMetric>,
}

/// A CVSS metric; v2 puts `baseSeverity` beside `cvssData`, v3 inside it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdMetric {
    #[serde(default)]
    pub base_severity: Option<String>,
    #[serde(default)]
    pub cvss_data: NvdCvssData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdCvssData {
    #[serde(default)]
    pub base_severity: Option<String>,
    #[serde(default)]
    pub base_score: Option<f64>,
}

impl NvdMetric {
    fn severity(&self) -> Option<&str> {
        self.cvss_data
            .base_severity
            .as_deref()
            .or(self.base_severity.as_deref())
    }
}

impl NvdCve {
    /// English description, else the first one.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.descriptions
            .iter()
            .find(|d| d.lang.eq_ignore_ascii_case("en"))
            .or_else(|| self.descriptions.first())
            .map_or("", |d| d.value.as_str())
    }

    /// First severity label among CVSS v3.1, v3.0, v2.
    #[must_use]
    pub fn severity(&self) -> Option<&str> {
        [&self.metrics.v31, &self.metrics.v30, &self.metrics.v2]
            .into_iter()
            .find_map(|metrics| metrics.iter().find_map(NvdMetric::severity))
    }
}
