//! OSV API HTTP client.

use super::response::{OsvQuery, OsvQueryResponse, OsvVulnerability};
use crate::enrichment::{api_error, http_client, invalid_response, network_error};
use crate::error::Result;
use reqwest::blocking::Client;
use std::time::Duration;

/// OSV API client configuration.
#[derive(Debug, Clone)]
pub struct OsvClientConfig {
    /// Base URL for OSV API
    pub api_base: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OsvClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.osv.dev".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// HTTP client for OSV API.
pub struct OsvClient {
    client: Client,
    config: OsvClientConfig,
}

impl OsvClient {
    pub fn new(config: OsvClientConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout)?,
            config,
        })
    }

    /// Run one query. A package OSV does not know (HTTP 404) has no findings.
    pub fn query(&self, query: &OsvQuery) -> Result<Vec<OsvVulnerability>> {
        let url = format!("{}/v1/query", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(query)
            .send()
            .map_err(|e| network_error("Failed to send OSV query", e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(api_error(format!(
                "OSV API returned error status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body = response
            .text()
            .map_err(|e| network_error("Failed to read OSV response", e))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: OsvQueryResponse =
            serde_json::from_str(&body).map_err(|e| invalid_response("parsing OSV response", e))?;
        Ok(parsed.vulns)
    }
}
