//! Latest version from a GitHub repository's tags.

use super::{highest_version, LatestVersionSource};
use crate::enrichment::{api_error, http_client, invalid_response, network_error};
use crate::error::{CheckerError, Result};
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Default GitHub REST API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GitHubTag {
    name: String,
}

/// Reads `GET /repos/{owner}/{repo}/tags` and picks the highest release tag.
///
/// An optional pattern narrows and rewrites tags: group 1 (or the whole
/// match) becomes the candidate version. lwIP's `STABLE-2_2_0` style is
/// handled by a pattern such as `^STABLE-(\d+_\d+_\d+)$`; underscores in
/// the candidate are read as dots.
pub struct GitHubTagsLatest {
    client: Client,
    api_base: String,
    repo: String,
    tag_pattern: Option<Regex>,
}

impl GitHubTagsLatest {
    pub fn new(repo: &str, tag_pattern: Option<&str>, timeout: Duration) -> Result<Self> {
        let tag_pattern = tag_pattern
            .map(Regex::new)
            .transpose()
            .map_err(|e| CheckerError::config(format!("tag pattern for {repo}: {e}")))?;
        Ok(Self {
            client: http_client(timeout)?,
            api_base: GITHUB_API_BASE.to_string(),
            repo: repo.trim_matches('/').to_string(),
            tag_pattern,
        })
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn candidate(&self, tag: &str) -> Option<String> {
        match &self.tag_pattern {
            Some(pattern) => {
                let caps = pattern.captures(tag)?;
                let m = caps.get(1).or_else(|| caps.get(0))?;
                Some(m.as_str().replace('_', "."))
            }
            None => Some(tag.to_string()),
        }
    }
}

impl LatestVersionSource for GitHubTagsLatest {
    fn provenance(&self) -> String {
        format!("github:{}", self.repo)
    }

    fn latest_version(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/tags?per_page=100", self.api_base, self.repo);
        tracing::debug!("{}: listing tags from {}", name, url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| network_error("listing repository tags", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(format!(
                "GitHub returned status {} for {}",
                response.status().as_u16(),
                self.repo
            )));
        }

        let tags: Vec<GitHubTag> = response
            .json()
            .map_err(|e| invalid_response("parsing tag list", e))?;

        Ok(highest_version(
            tags.iter().filter_map(|t| self.candidate(&t.name)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_and_candidates() {
        let source =
            GitHubTagsLatest::new("lwip-tcpip/lwip/", Some(r"^STABLE-(\d+_\d+_\d+)"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(source.provenance(), "github:lwip-tcpip/lwip");
        assert_eq!(source.candidate("STABLE-2_2_0"), Some("2.2.0".to_string()));
        assert_eq!(source.candidate("master"), None);
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let err = GitHubTagsLatest::new("a/b", Some("("), Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, CheckerError::Config(_)));
    }
}
