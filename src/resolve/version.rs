//! Version normalization and comparison.
//!
//! Catalog and SBOM versions are inconsistently formatted (`v10.4.3`,
//! `V2.1.2`, `2.28.0-rc1`, `R2.1`). Nothing here validates semantic
//! versioning: a version is split into dot/dash separated segments and
//! compared segment by segment, numerically where a segment is a number.

use std::cmp::Ordering;
use std::fmt;

/// Strip the leading `v`/`V` prefix from a version for display and comparison.
///
/// Returns an empty string for a missing version. Anything else is kept
/// verbatim, so malformed versions still display meaningfully.
#[must_use]
pub fn normalize<'a>(raw: impl Into<Option<&'a str>>) -> String {
    raw.into()
        .map(|v| v.trim_start_matches(['v', 'V']).to_string())
        .unwrap_or_default()
}

/// One segment of a [`CanonicalKey`].
///
/// Numeric segments order before textual ones, so `1.2` < `1.2.rc1`
/// compares `2 == 2` and then the shorter key first, while `1.10` > `1.9`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Number(u64),
    Text(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Comparable form of a version string. Used for equality and ordering,
/// never for display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(Vec<Segment>);

impl CanonicalKey {
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Whether the key starts with a numeric segment, i.e. looks like a
    /// release number rather than a branch or tag name.
    #[must_use]
    pub fn is_numeric_release(&self) -> bool {
        matches!(self.0.first(), Some(Segment::Number(_)))
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Build the canonical key of a version string.
#[must_use]
pub fn canonical_key<'a>(raw: impl Into<Option<&'a str>>) -> CanonicalKey {
    let cleaned = normalize(raw).replace('-', ".");
    CanonicalKey(
        cleaned
            .split('.')
            .map(|part| {
                part.trim()
                    .parse::<u64>()
                    .map_or_else(|_| Segment::Text(part.to_string()), Segment::Number)
            })
            .collect(),
    )
}

/// Compare two version strings by canonical key.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    canonical_key(a).cmp(&canonical_key(b))
}

/// Whether two version strings denote the same version (`1.0` == `v1.0`).
#[must_use]
pub fn same_version(a: &str, b: &str) -> bool {
    canonical_key(a) == canonical_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_prefix() {
        assert_eq!(normalize("v1.2.3"), "1.2.3");
        assert_eq!(normalize("V10.4.3"), "10.4.3");
        assert_eq!(normalize("1.2.3"), "1.2.3");
        assert_eq!(normalize(None), "");
        assert_eq!(normalize("release-7"), "release-7");
    }

    #[test]
    fn test_canonical_key_ignores_prefix() {
        assert_eq!(canonical_key("v1.2.3"), canonical_key("1.2.3"));
        assert!(same_version("1.0", "V1.0"));
        assert!(!same_version("1.0", "1.0.0"));
    }

    #[test]
    fn test_canonical_key_segments() {
        let key = canonical_key("2.28.0-rc1");
        assert_eq!(
            key.segments(),
            &[
                Segment::Number(2),
                Segment::Number(28),
                Segment::Number(0),
                Segment::Text("rc1".to_string()),
            ]
        );
        assert_eq!(key.to_string(), "2.28.0.rc1");
    }

    #[test]
    fn test_compare_versions_numeric() {
        assert_eq!(compare_versions("1.9", "1.10"), Ordering::Less);
        assert_eq!(compare_versions("v2.0", "2.0"), Ordering::Equal);
        assert_eq!(compare_versions("2.1", "2.0.9"), Ordering::Greater);
    }

    #[test]
    fn test_text_segments_compare_lexicographically() {
        assert_eq!(compare_versions("1.beta", "1.alpha"), Ordering::Greater);
        assert_eq!(compare_versions("1.2", "1.x"), Ordering::Less);
    }

    #[test]
    fn test_numeric_release_detection() {
        assert!(canonical_key("V10.5.1").is_numeric_release());
        assert!(!canonical_key("main").is_numeric_release());
        assert!(!canonical_key("").is_numeric_release());
    }
}
