//! Data model shared by the reconciliation core and its collaborators.
//!
//! - [`LibraryComponent`]: what an SBOM declares
//! - [`ReleaseRecord`]: what the release catalog knows
//! - [`ResolvedLibrary`]: what reconciliation concludes
//! - [`VulnerabilityRecord`] / [`VulnerabilityReport`]: what vulnerability
//!   sources report, with per-source query provenance

mod component;
mod release;
mod resolved;
mod vulnerability;

pub use component::LibraryComponent;
pub use release::ReleaseRecord;
pub use resolved::{LatestVersion, ResolvedLibrary, SecurityLabel, Status, NOT_DETERMINED};
pub use vulnerability::{
    dedup_records, SourceFindings, VulnerabilityRecord, VulnerabilityReport,
};
