//! Version resolution core.
//!
//! Three steps, applied per library:
//!
//! 1. [`version`]: normalize declared and catalogued versions into a
//!    comparable [`CanonicalKey`].
//! 2. [`history`]: order the catalogued releases and locate the declared
//!    version among them.
//! 3. [`classify`]: derive the update status and security label from the
//!    releases published after the declared one.
//!
//! ```
//! use fw_sbom_checker::model::{ReleaseRecord, Status};
//! use fw_sbom_checker::resolve::{classify, resolve};
//!
//! let releases = vec![
//!     ReleaseRecord::new("1.0").with_date("2020-01-01"),
//!     ReleaseRecord::new("1.1").with_date("2020-06-01").with_security("true"),
//! ];
//! let history = resolve(releases, "v1.0");
//! assert_eq!(classify(&history).status, Status::NeedsUpdate);
//! ```

pub mod classify;
pub mod history;
pub mod version;

pub use classify::{classify, is_security_release, security_notes, Classification};
pub use history::{resolve, sort_releases, ResolvedHistory};
pub use version::{canonical_key, compare_versions, normalize, same_version, CanonicalKey, Segment};
