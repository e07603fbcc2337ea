//! Provider trait for pluggable vulnerability sources.

use super::plan::{QueryDescriptor, QueryTarget};
use crate::error::Result;
use crate::model::VulnerabilityRecord;

/// A vulnerability source the aggregator can query.
///
/// Implement this trait to add new vulnerability data sources. A provider
/// answers one query attempt at a time; fallback across attempts, early
/// exit and deduplication are the aggregator's job.
///
/// # Example
///
/// ```ignore
/// struct Offline;
///
/// impl VulnerabilityProvider for Offline {
///     fn name(&self) -> &str { "offline" }
///     fn query(&self, _q: &QueryDescriptor) -> Result<Vec<VulnerabilityRecord>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait VulnerabilityProvider: Send + Sync {
    /// Source tag stamped on findings and reports (e.g. "OSV", "NVD").
    fn name(&self) -> &str;

    /// Whether this provider can answer queries of this shape.
    ///
    /// Unsupported attempts are skipped, not counted as failures.
    fn supports(&self, target: &QueryTarget) -> bool {
        let _ = target;
        true
    }

    /// Run one query attempt.
    ///
    /// `Ok(vec![])` means the source answered and knows nothing; an error
    /// means the source could not be asked.
    fn query(&self, query: &QueryDescriptor) -> Result<Vec<VulnerabilityRecord>>;
}
