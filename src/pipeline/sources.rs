//! SBOM discovery and loading for a reconciliation run.

use crate::parsers::{is_sbom_file, read_components, LibraryFilter};
use crate::model::LibraryComponent;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Monitored libraries read from one SBOM file.
#[derive(Debug, Clone)]
pub struct LoadedSbom {
    pub path: PathBuf,
    pub libraries: Vec<LibraryComponent>,
}

impl LoadedSbom {
    /// File name for display, falling back to the full path.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// SBOM files (`.json`, `.spdx`) directly inside `dir`, sorted by path.
pub fn discover_sboms(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read SBOM directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list SBOM directory: {}", dir.display()))?
            .path();
        if is_sbom_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    tracing::debug!("Found {} SBOM files in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Resolve the SBOM files for a run: explicit paths win, else `sbom_dir`.
///
/// Directories among the explicit paths are expanded.
pub fn collect_sbom_paths(paths: &[PathBuf], sbom_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        let Some(dir) = sbom_dir else {
            anyhow::bail!("No SBOM files given and no sbom_dir configured");
        };
        return discover_sboms(dir);
    }

    let mut collected = Vec::new();
    for path in paths {
        if path.is_dir() {
            collected.extend(discover_sboms(path)?);
        } else {
            collected.push(path.clone());
        }
    }
    Ok(collected)
}

/// Read one SBOM, keeping the monitored libraries.
pub fn load_sbom(path: &Path, filter: &LibraryFilter, quiet: bool) -> Result<LoadedSbom> {
    if !quiet {
        tracing::info!("Reading SBOM: {}", path.display());
    }

    let libraries = read_components(path, filter)
        .with_context(|| format!("Failed to read SBOM: {}", path.display()))?;

    if libraries.is_empty() {
        tracing::warn!("{}: no monitored libraries found", path.display());
    }

    Ok(LoadedSbom {
        path: path.to_path_buf(),
        libraries,
    })
}
