//! Security classification of the releases after the declared version.

use super::history::ResolvedHistory;
use crate::model::{ReleaseRecord, SecurityLabel, Status};

/// Tokens that mark a release as explicitly *not* a security release.
const NON_SECURITY_TOKENS: [&str; 3] = ["0", "false", ""];

/// Whether a catalog security flag marks a security release.
///
/// Permissive on purpose: catalogs are populated inconsistently, so any
/// token other than `0`, `false` or blank (case-insensitive, trimmed) counts,
/// including free text such as `yes` or `CVE fix`.
#[must_use]
pub fn is_security_release(flag: Option<&str>) -> bool {
    flag.is_some_and(|f| {
        let token = f.trim().to_lowercase();
        !NON_SECURITY_TOKENS.contains(&token.as_str())
    })
}

/// Status, label and notes derived from a resolved history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: Status,
    pub security_label: SecurityLabel,
    pub security_notes: Vec<ReleaseRecord>,
}

/// Security releases among `intermediate`, in release order.
#[must_use]
pub fn security_notes(intermediate: &[ReleaseRecord]) -> Vec<ReleaseRecord> {
    intermediate
        .iter()
        .filter(|r| r.is_security_release())
        .cloned()
        .collect()
}

/// Classify a resolved history.
///
/// The notes are computed first; status and label follow from whether any
/// were found.
#[must_use]
pub fn classify(history: &ResolvedHistory) -> Classification {
    if !history.has_history() || history.current().is_none() {
        return Classification {
            status: Status::Unknown,
            security_label: SecurityLabel::NotApplicable,
            security_notes: Vec::new(),
        };
    }

    let notes = security_notes(history.intermediate());
    let (status, security_label) = if notes.is_empty() {
        (Status::UpToDate, SecurityLabel::Secure)
    } else {
        (Status::NeedsUpdate, SecurityLabel::NotSecure)
    };

    Classification {
        status,
        security_label,
        security_notes: notes,
    }
}
