//! Vulnerability query planning.
//!
//! For one library the planner lists every way a vulnerability source could
//! be asked about it, most specific first:
//!
//! 1. the package URL carried by the SBOM entry
//! 2. the package URL from the known-reference table
//! 3. ecosystem + canonical name from the known-reference table
//! 4. ecosystem + canonical name derived from the entry's reference URLs
//! 5. the CPE carried by the SBOM entry
//! 6. the free-text library name (always present)
//!
//! Attempts whose payload identity is the same are collapsed, keeping the
//! first label.

use crate::model::LibraryComponent;
use crate::resolve::normalize;
use indexmap::IndexMap;
use packageurl::PackageUrl;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

/// Ecosystem tag used for GitHub-hosted projects.
pub const GITHUB_ECOSYSTEM: &str = "GitHub";

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://|git@|git://)?(?:www\.)?github\.com[/:]([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:[/#?].*)?$")
        .expect("static regex")
});

/// Non-GitHub forges with a fixed vulnerability identity: (URL fragment, ecosystem, name).
const KNOWN_FORGES: &[(&str, &str, &str)] = &[
    (
        "git.savannah.nongnu.org/git/lwip",
        "GIT",
        "https://git.savannah.nongnu.org/git/lwip.git",
    ),
    (
        "savannah.nongnu.org/projects/lwip",
        "GIT",
        "https://git.savannah.nongnu.org/git/lwip.git",
    ),
    ("freertos.org", GITHUB_ECOSYSTEM, "FreeRTOS/FreeRTOS-Kernel"),
    ("trustedfirmware.org/projects/mbed-tls", GITHUB_ECOSYSTEM, "Mbed-TLS/mbedtls"),
];

/// Package URL types with a matching vulnerability ecosystem, and the
/// separator joining namespace and name in that ecosystem.
const PURL_ECOSYSTEMS: &[(&str, &str, &str)] = &[
    ("github", GITHUB_ECOSYSTEM, "/"),
    ("pypi", "PyPI", "/"),
    ("npm", "npm", "/"),
    ("cargo", "crates.io", "/"),
    ("golang", "Go", "/"),
    ("maven", "Maven", ":"),
    ("nuget", "NuGet", "/"),
    ("gem", "RubyGems", "/"),
    ("composer", "Packagist", "/"),
];

/// What a single query attempt asks about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryTarget {
    Purl { purl: String },
    Package { ecosystem: String, name: String },
    Cpe { cpe: String },
    Name { name: String },
}

/// One planned query attempt with its diagnostic label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Human-readable provenance, e.g. `purl pkg:github/...` or `GitHub::owner/repo`
    pub label: String,
    pub target: QueryTarget,
    /// Normalized version to ask about
    pub version: String,
}

/// What a provider is actually asked, independent of how the attempt was
/// spelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum PayloadIdentity {
    /// A purl that already pins its version
    PinnedPurl(String),
    Purl(String, String),
    Package(String, String, String),
    Cpe(String, String),
    Name(String, String),
}

impl QueryDescriptor {
    #[must_use]
    pub fn purl(purl: &str, version: &str) -> Self {
        Self {
            label: format!("purl {purl}"),
            target: QueryTarget::Purl {
                purl: purl.to_string(),
            },
            version: version.to_string(),
        }
    }

    #[must_use]
    pub fn package(ecosystem: &str, name: &str, version: &str) -> Self {
        Self {
            label: format!("{ecosystem}::{name}"),
            target: QueryTarget::Package {
                ecosystem: ecosystem.to_string(),
                name: name.to_string(),
            },
            version: version.to_string(),
        }
    }

    #[must_use]
    pub fn cpe(cpe: &str, version: &str) -> Self {
        Self {
            label: format!("cpe {cpe}"),
            target: QueryTarget::Cpe {
                cpe: cpe.to_string(),
            },
            version: version.to_string(),
        }
    }

    #[must_use]
    pub fn name(name: &str, version: &str) -> Self {
        Self {
            label: format!("name '{name}'"),
            target: QueryTarget::Name {
                name: name.to_string(),
            },
            version: version.to_string(),
        }
    }

    /// The package URL's embedded version, if the target is a pinned purl.
    #[must_use]
    pub fn pinned_purl_version(&self) -> Option<String> {
        match &self.target {
            QueryTarget::Purl { purl } => PackageUrl::from_str(purl)
                .ok()
                .and_then(|p| p.version().map(str::to_string)),
            _ => None,
        }
    }

    pub(crate) fn identity(&self) -> PayloadIdentity {
        let version = self.version.clone();
        match &self.target {
            QueryTarget::Purl { purl } => match PackageUrl::from_str(purl) {
                Ok(parsed) if parsed.version().is_some() => {
                    PayloadIdentity::PinnedPurl(purl.clone())
                }
                Ok(parsed) => match purl_package(&parsed) {
                    Some((ecosystem, name)) => PayloadIdentity::Package(
                        ecosystem.to_lowercase(),
                        name.to_lowercase(),
                        version,
                    ),
                    None => PayloadIdentity::Purl(purl.clone(), version),
                },
                Err(_) => PayloadIdentity::Purl(purl.clone(), version),
            },
            QueryTarget::Package { ecosystem, name } => {
                PayloadIdentity::Package(ecosystem.to_lowercase(), name.to_lowercase(), version)
            }
            QueryTarget::Cpe { cpe } => PayloadIdentity::Cpe(cpe.clone(), version),
            QueryTarget::Name { name } => PayloadIdentity::Name(name.clone(), version),
        }
    }
}

/// Ecosystem and qualified name for a package URL whose type has one.
fn purl_package(purl: &PackageUrl<'_>) -> Option<(String, String)> {
    let (_, ecosystem, sep) = PURL_ECOSYSTEMS
        .iter()
        .find(|(ty, _, _)| ty.eq_ignore_ascii_case(purl.ty()))?;
    let name = match purl.namespace() {
        Some(ns) if !ns.is_empty() => format!("{ns}{sep}{}", purl.name()),
        _ => purl.name().to_string(),
    };
    Some(((*ecosystem).to_string(), name))
}

/// Ecosystem and name of the project behind a reference URL.
///
/// GitHub URLs yield `GitHub` + `owner/repo`; a few other forges map to a
/// fixed pair.
#[must_use]
pub fn reference_package(url: &str) -> Option<(String, String)> {
    let url = url.trim();
    if let Some(caps) = GITHUB_URL.captures(url) {
        return Some((
            GITHUB_ECOSYSTEM.to_string(),
            format!("{}/{}", &caps[1], &caps[2]),
        ));
    }
    let lowered = url.to_lowercase();
    KNOWN_FORGES
        .iter()
        .find(|(fragment, _, _)| lowered.contains(fragment))
        .map(|(_, ecosystem, name)| ((*ecosystem).to_string(), (*name).to_string()))
}

/// Static vulnerability identity of a monitored library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<String>,
    /// Canonical project name within `ecosystem`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl KnownRef {
    fn github(owner_repo: &str) -> Self {
        Self {
            purl: Some(format!("pkg:github/{owner_repo}")),
            ecosystem: Some(GITHUB_ECOSYSTEM.to_string()),
            name: Some(owner_repo.to_string()),
        }
    }
}

/// Case-insensitive table of known references.
#[derive(Debug, Clone, Default)]
pub struct KnownRefs {
    refs: IndexMap<String, KnownRef>,
}

impl KnownRefs {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// References for the monitored firmware libraries.
    #[must_use]
    pub fn builtin() -> Self {
        let mut refs = Self::new();
        refs.insert("FreeRTOS", KnownRef::github("FreeRTOS/FreeRTOS-Kernel"));
        refs.insert("mbedTLS", KnownRef::github("Mbed-TLS/mbedtls"));
        refs.insert("OpenAMP", KnownRef::github("OpenAMP/open-amp"));
        refs.insert(
            "STM32H7xx_HAL_Driver",
            KnownRef::github("STMicroelectronics/stm32h7xx_hal_driver"),
        );
        refs.insert(
            "STM32_USB_Host_Library",
            KnownRef::github("STMicroelectronics/stm32_mw_usb_host"),
        );
        refs.insert(
            "STM32_USB_Device_Library",
            KnownRef::github("STMicroelectronics/stm32_mw_usb_device"),
        );
        refs.insert(
            "LwIP",
            KnownRef {
                purl: None,
                ecosystem: Some("GIT".to_string()),
                name: Some("https://git.savannah.nongnu.org/git/lwip.git".to_string()),
            },
        );
        refs
    }

    pub fn insert(&mut self, name: &str, known: KnownRef) {
        self.refs.insert(name.to_lowercase(), known);
    }

    /// Replace entries with `overrides`, keyed by library name.
    #[must_use]
    pub fn with_overrides<'a>(mut self, overrides: impl IntoIterator<Item = (&'a String, &'a KnownRef)>) -> Self {
        for (name, known) in overrides {
            self.insert(name, known.clone());
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KnownRef> {
        self.refs.get(&name.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Builds ordered query attempts for library components.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    known: KnownRefs,
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new(KnownRefs::builtin())
    }
}

impl QueryPlanner {
    #[must_use]
    pub fn new(known: KnownRefs) -> Self {
        Self { known }
    }

    #[must_use]
    pub fn known_refs(&self) -> &KnownRefs {
        &self.known
    }

    /// Plan the query attempts for `component` at `version`.
    #[must_use]
    pub fn plan(&self, component: &LibraryComponent, version: &str) -> Vec<QueryDescriptor> {
        build_plan(component, version, self.known.get(&component.name))
    }
}

/// Ordered query attempts for one library, without exact repeats.
///
/// `version` is normalized before use; the free-text name attempt is always
/// last. Attempts that spell the same payload differently (a versionless
/// purl and its ecosystem package) are all kept here: which one a source
/// runs depends on the targets it supports, see
/// [`aggregate_source`](super::aggregate_source).
#[must_use]
pub fn build_plan(
    component: &LibraryComponent,
    version: &str,
    known: Option<&KnownRef>,
) -> Vec<QueryDescriptor> {
    let version = normalize(version);
    let mut attempts = Vec::new();

    if let Some(purl) = non_blank(component.purl.as_deref()) {
        attempts.push(QueryDescriptor::purl(purl, &version));
    }

    if let Some(known) = known {
        if let Some(purl) = non_blank(known.purl.as_deref()) {
            attempts.push(QueryDescriptor::purl(purl, &version));
        }
        if let (Some(ecosystem), Some(name)) = (
            non_blank(known.ecosystem.as_deref()),
            non_blank(known.name.as_deref()),
        ) {
            attempts.push(QueryDescriptor::package(ecosystem, name, &version));
        }
    }

    for url in &component.references {
        if let Some((ecosystem, name)) = reference_package(url) {
            attempts.push(QueryDescriptor::package(&ecosystem, &name, &version));
        }
    }

    if let Some(cpe) = non_blank(component.cpe.as_deref()) {
        attempts.push(QueryDescriptor::cpe(cpe, &version));
    }

    attempts.push(QueryDescriptor::name(&component.name, &version));

    let mut seen = HashSet::new();
    attempts.retain(|attempt| seen.insert((attempt.target.clone(), attempt.version.clone())));
    attempts
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
