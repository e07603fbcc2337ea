//! NVD CVE API HTTP client.

use super::response::NvdResponse;
use crate::enrichment::{api_error, http_client, invalid_response, network_error};
use crate::error::Result;
use reqwest::blocking::Client;
use std::time::Duration;

/// NVD client configuration.
#[derive(Debug, Clone)]
pub struct NvdClientConfig {
    /// Base URL for the NVD API
    pub api_base: String,
    /// Request timeout
    pub timeout: Duration,
    /// `resultsPerPage` sent with every search
    pub max_results: u32,
}

impl Default for NvdClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://services.nvd.nist.gov".to_string(),
            timeout: Duration::from_secs(15),
            max_results: 20,
        }
    }
}

/// Search parameter for one CVE lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NvdSearch {
    Keyword(String),
    CpeName(String),
}

impl NvdSearch {
    fn param(&self) -> (&'static str, &str) {
        match self {
            Self::Keyword(term) => ("keywordSearch", term),
            Self::CpeName(cpe) => ("cpeName", cpe),
        }
    }
}

/// HTTP client for `GET /rest/json/cves/2.0`.
pub struct NvdClient {
    client: Client,
    config: NvdClientConfig,
}

impl NvdClient {
    pub fn new(config: NvdClientConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout)?,
            config,
        })
    }

    pub fn search(&self, search: &NvdSearch) -> Result<NvdResponse> {
        let url = format!(
            "{}/rest/json/cves/2.0",
            self.config.api_base.trim_end_matches('/')
        );
        let per_page = self.config.max_results.to_string();
        let (key, value) = search.param();

        let response = self
            .client
            .get(&url)
            .query(&[("resultsPerPage", per_page.as_str()), (key, value)])
            .send()
            .map_err(|e| network_error("Failed to send NVD request", e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(NvdResponse::default());
        }
        if !status.is_success() {
            return Err(api_error(format!(
                "NVD API returned error status {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .map_err(|e| invalid_response("parsing NVD response", e))
    }
}
