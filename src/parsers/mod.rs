//! SBOM readers.
//!
//! Reads CycloneDX JSON and SPDX tag-value documents into
//! [`LibraryComponent`]s for the monitored firmware libraries.
//!
//! ## Format Detection
//!
//! - `.json` files are read as CycloneDX JSON
//! - `.spdx` files are read as SPDX tag-value
//! - anything else is tried as JSON first, then as tag-value
//!
//! ## Usage
//!
//! ```no_run
//! use fw_sbom_checker::parsers::{read_components, LibraryFilter};
//! use std::path::Path;
//!
//! let libraries = read_components(Path::new("firmware.spdx"), &LibraryFilter::default())?;
//! for lib in &libraries {
//!     println!("{} {}", lib.name, lib.declared_version);
//! }
//! # Ok::<(), fw_sbom_checker::error::CheckerError>(())
//! ```

mod cyclonedx;
mod names;
mod spdx;

pub use cyclonedx::CycloneDxReader;
pub use names::LibraryFilter;
pub use spdx::SpdxTagValueReader;

use crate::error::{CheckerError, Result};
use crate::model::LibraryComponent;
use std::fmt;
use std::path::Path;

/// SBOM document formats understood by the readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SbomFormat {
    CycloneDxJson,
    SpdxTagValue,
}

impl SbomFormat {
    /// Format implied by a file extension, if any.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::CycloneDxJson),
            "spdx" => Some(Self::SpdxTagValue),
            _ => None,
        }
    }

    fn reader(self) -> Box<dyn SbomReader> {
        match self {
            Self::CycloneDxJson => Box::new(CycloneDxReader::new()),
            Self::SpdxTagValue => Box::new(SpdxTagValueReader::new()),
        }
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycloneDxJson => write!(f, "CycloneDX JSON"),
            Self::SpdxTagValue => write!(f, "SPDX tag-value"),
        }
    }
}

/// A reader for one SBOM format.
///
/// Readers return every entry that has both a name and a version, with the
/// name as written in the document. Canonicalization is [`LibraryFilter`]'s
/// job.
pub trait SbomReader {
    fn format(&self) -> SbomFormat;

    fn read_str(&self, content: &str) -> Result<Vec<LibraryComponent>>;
}

/// Whether a path looks like an SBOM this crate can read.
#[must_use]
pub fn is_sbom_file(path: &Path) -> bool {
    path.is_file() && SbomFormat::from_path(path).is_some()
}

/// Read raw entries from SBOM content.
///
/// With no format hint, JSON is tried first; an unparseable or empty JSON
/// result falls through to tag-value.
pub fn parse_str(content: &str, format: Option<SbomFormat>) -> Result<Vec<LibraryComponent>> {
    if let Some(format) = format {
        return format.reader().read_str(content);
    }

    match CycloneDxReader::new().read_str(content) {
        Ok(components) if !components.is_empty() => return Ok(components),
        Ok(_) => {}
        Err(e) => tracing::debug!("Not CycloneDX JSON: {e}"),
    }
    SpdxTagValueReader::new().read_str(content)
}

/// Read an SBOM file and keep only the monitored libraries, canonically named.
pub fn read_components(path: &Path, filter: &LibraryFilter) -> Result<Vec<LibraryComponent>> {
    let content = std::fs::read_to_string(path).map_err(|e| CheckerError::io(path, e))?;
    let format = SbomFormat::from_path(path);

    let raw = parse_str(&content, format).map_err(|e| match e {
        CheckerError::Parse { .. } if format.is_none() => {
            CheckerError::unknown_format(path.display().to_string())
        }
        other => other,
    })?;

    let libraries = filter.apply(raw);
    tracing::debug!(
        "Read {} monitored libraries from {}",
        libraries.len(),
        path.display()
    );
    Ok(libraries)
}
