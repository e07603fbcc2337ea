//! Release catalog records.

use crate::resolve::is_security_release;
use serde::{Deserialize, Deserializer, Serialize};

/// One known release of a library, as stored in the release catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Version exactly as catalogued
    pub version: String,
    /// Free-text release notes, possibly multi-line
    #[serde(default)]
    pub release_notes: String,
    /// ISO date (`YYYY-MM-DD`), absent when unknown
    #[serde(default)]
    pub release_date: Option<String>,
    /// Tri-state security flag token: absent means unset
    #[serde(default, rename = "security", deserialize_with = "flag_token")]
    pub security_flag: Option<String>,
    /// CVE identifiers, newline separated
    #[serde(default)]
    pub cve: String,
}

impl ReleaseRecord {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            release_notes: String::new(),
            release_date: None,
            security_flag: None,
            cve: String::new(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_security(mut self, flag: impl Into<String>) -> Self {
        self.security_flag = Some(flag.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.release_notes = notes.into();
        self
    }

    #[must_use]
    pub fn with_cve(mut self, cve: impl Into<String>) -> Self {
        self.cve = cve.into();
        self
    }

    /// Whether the catalog flags this release as a security release.
    #[must_use]
    pub fn is_security_release(&self) -> bool {
        is_security_release(self.security_flag.as_deref())
    }

    /// Release date, treating blank strings as absent.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Individual CVE identifiers listed for this release.
    pub fn cve_ids(&self) -> impl Iterator<Item = &str> {
        self.cve
            .split(['\n', ',', ';'])
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Accept the security flag as a string, bool or number and keep its token.
fn flag_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}
