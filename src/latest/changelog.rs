//! Latest version scraped from a published changelog.

use super::{capture_versions, highest_version, LatestVersionSource};
use crate::enrichment::{api_error, http_client, network_error};
use crate::error::{CheckerError, Result};
use regex::Regex;
use reqwest::blocking::Client;
use std::time::Duration;

/// Matches dotted version numbers such as `V10.4.6` or `2.2.0`.
pub const DEFAULT_CHANGELOG_PATTERN: &str = r"(?i)\bv?(\d+(?:\.\d+)+)\b";

/// Fetches a changelog page and reports the highest version it mentions.
pub struct ChangelogLatest {
    client: Client,
    url: String,
    pattern: Regex,
}

impl ChangelogLatest {
    pub fn new(url: &str, pattern: Option<&str>, timeout: Duration) -> Result<Self> {
        let pattern = Regex::new(pattern.unwrap_or(DEFAULT_CHANGELOG_PATTERN))
            .map_err(|e| CheckerError::config(format!("changelog pattern for {url}: {e}")))?;
        Ok(Self {
            client: http_client(timeout)?,
            url: url.to_string(),
            pattern,
        })
    }

    fn extract(&self, text: &str) -> Option<String> {
        highest_version(capture_versions(&self.pattern, text))
    }
}

impl LatestVersionSource for ChangelogLatest {
    fn provenance(&self) -> String {
        format!("changelog:{}", self.url)
    }

    fn latest_version(&self, name: &str) -> Result<Option<String>> {
        tracing::debug!("{}: fetching changelog {}", name, self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| network_error("fetching changelog", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(format!(
                "changelog {} returned status {}",
                self.url,
                response.status().as_u16()
            )));
        }

        let text = response
            .text()
            .map_err(|e| network_error("reading changelog body", e))?;
        Ok(self.extract(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_highest_mention() {
        let source = ChangelogLatest::new(
            "https://example.org/History.txt",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        let text = "Changes between V10.4.5 and V10.4.6 released 2021-11-12\n\
                    Changes between V10.4.4 and V10.4.5\n";
        assert_eq!(source.extract(text), Some("10.4.6".to_string()));
        assert_eq!(source.extract("no versions here"), None);
        assert_eq!(
            source.provenance(),
            "changelog:https://example.org/History.txt"
        );
    }
}
