//! Release history resolution.
//!
//! Orders a library's catalogued releases and locates the declared version
//! in that order, yielding the latest release, the current release and the
//! releases published after it.

use super::version::{canonical_key, normalize, CanonicalKey};
use crate::model::ReleaseRecord;
use std::collections::HashMap;

/// A release history ordered and positioned against a declared version.
#[derive(Debug, Clone, Default)]
pub struct ResolvedHistory {
    sorted: Vec<ReleaseRecord>,
    current_index: Option<usize>,
    duplicates: Vec<String>,
}

impl ResolvedHistory {
    /// All releases in release order.
    #[must_use]
    pub fn sorted(&self) -> &[ReleaseRecord] {
        &self.sorted
    }

    #[must_use]
    pub fn has_history(&self) -> bool {
        !self.sorted.is_empty()
    }

    /// Last release in release order.
    #[must_use]
    pub fn latest(&self) -> Option<&ReleaseRecord> {
        self.sorted.last()
    }

    /// First release whose canonical version equals the declared one.
    #[must_use]
    pub fn current(&self) -> Option<&ReleaseRecord> {
        self.current_index.map(|i| &self.sorted[i])
    }

    /// Releases strictly after the current release; empty without one.
    #[must_use]
    pub fn intermediate(&self) -> &[ReleaseRecord] {
        self.current_index
            .map_or(&[][..], |i| &self.sorted[i + 1..])
    }

    /// Canonical versions catalogued more than once, in release order.
    #[must_use]
    pub fn duplicate_versions(&self) -> &[String] {
        &self.duplicates
    }
}

/// Sort releases into release order.
///
/// Dated releases come first, by ISO date ascending; undated releases follow.
/// A blank or whitespace-only `release_date` counts as undated (see
/// [`ReleaseRecord::date`]).
/// Ties are broken by canonical version ascending, and the sort is stable
/// for releases that compare equal on both.
#[must_use]
pub fn sort_releases(mut releases: Vec<ReleaseRecord>) -> Vec<ReleaseRecord> {
    releases.sort_by_cached_key(release_order_key);
    releases
}

fn release_order_key(release: &ReleaseRecord) -> (bool, String, CanonicalKey) {
    let date = release.date();
    (
        date.is_none(),
        date.unwrap_or_default().to_string(),
        canonical_key(release.version.as_str()),
    )
}

/// Resolve a release history against a declared version.
#[must_use]
pub fn resolve(releases: Vec<ReleaseRecord>, declared_version: &str) -> ResolvedHistory {
    let sorted = sort_releases(releases);
    let declared = canonical_key(declared_version);

    let mut current_index = None;
    let mut occurrences: HashMap<CanonicalKey, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for (idx, release) in sorted.iter().enumerate() {
        let key = canonical_key(release.version.as_str());
        if current_index.is_none() && key == declared {
            current_index = Some(idx);
        }
        let seen = occurrences.entry(key).or_insert(0);
        *seen += 1;
        if *seen == 2 {
            duplicates.push(normalize(release.version.as_str()));
        }
    }

    if !duplicates.is_empty() {
        tracing::warn!(
            "Release catalog lists duplicate versions {:?}; the first in release order is used",
            duplicates
        );
    }

    ResolvedHistory {
        sorted,
        current_index,
        duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(records: &[ReleaseRecord]) -> Vec<&str> {
        records.iter().map(|r| r.version.as_str()).collect()
    }

    fn sample_catalog() -> Vec<ReleaseRecord> {
        vec![
            ReleaseRecord::new("1.2").with_date(""),
            ReleaseRecord::new("1.1")
                .with_date("2020-06-01")
                .with_security("true"),
            ReleaseRecord::new("1.0").with_date("2020-01-01"),
        ]
    }

    #[test]
    fn test_undated_releases_sort_last() {
        let sorted = sort_releases(sample_catalog());
        assert_eq!(versions(&sorted), vec!["1.0", "1.1", "1.2"]);
    }

    #[test]
    fn test_whitespace_date_counts_as_undated() {
        let releases = vec![
            ReleaseRecord::new("0.9").with_date("  "),
            ReleaseRecord::new("1.0").with_date("2020-01-01"),
        ];
        let sorted = sort_releases(releases);
        assert_eq!(versions(&sorted), vec!["1.0", "0.9"]);
    }

    #[test]
    fn test_same_date_breaks_ties_by_version() {
        let releases = vec![
            ReleaseRecord::new("2.10").with_date("2022-01-01"),
            ReleaseRecord::new("2.9").with_date("2022-01-01"),
            ReleaseRecord::new("3.0"),
            ReleaseRecord::new("2.11"),
        ];
        let sorted = sort_releases(releases);
        assert_eq!(versions(&sorted), vec!["2.9", "2.10", "2.11", "3.0"]);
    }

    #[test]
    fn test_date_outranks_version() {
        let releases = vec![
            ReleaseRecord::new("1.0.9").with_date("2021-05-01"),
            ReleaseRecord::new("1.1.0").with_date("2021-01-01"),
        ];
        let sorted = sort_releases(releases);
        assert_eq!(versions(&sorted), vec!["1.1.0", "1.0.9"]);
    }

    #[test]
    fn test_resolve_positions_current_release() {
        let history = resolve(sample_catalog(), "v1.0");
        assert_eq!(history.current().map(|r| r.version.as_str()), Some("1.0"));
        assert_eq!(history.latest().map(|r| r.version.as_str()), Some("1.2"));
        assert_eq!(versions(history.intermediate()), vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_resolve_latest_has_no_intermediate() {
        let history = resolve(sample_catalog(), "1.2");
        assert!(history.current().is_some());
        assert!(history.intermediate().is_empty());
    }

    #[test]
    fn test_resolve_unknown_version() {
        let history = resolve(sample_catalog(), "9.9");
        assert!(history.has_history());
        assert!(history.current().is_none());
        assert!(history.intermediate().is_empty());
    }

    #[test]
    fn test_resolve_empty_history() {
        let history = resolve(Vec::new(), "1.0");
        assert!(!history.has_history());
        assert!(history.latest().is_none());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_duplicates_are_flagged_and_first_wins() {
        let releases = vec![
            ReleaseRecord::new("v2.0")
                .with_date("2021-02-01")
                .with_notes("re-import"),
            ReleaseRecord::new("2.0")
                .with_date("2021-01-01")
                .with_notes("original"),
            ReleaseRecord::new("2.1").with_date("2021-03-01"),
        ];
        let history = resolve(releases, "2.0");
        assert_eq!(history.duplicate_versions(), &["2.0".to_string()]);
        assert_eq!(
            history.current().map(|r| r.release_notes.as_str()),
            Some("original")
        );
        assert_eq!(versions(history.intermediate()), vec!["v2.0", "2.1"]);
    }
}
