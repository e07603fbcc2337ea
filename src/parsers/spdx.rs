//! SPDX tag-value reader.
//!
//! Each `PackageName:` line starts a new package; the tags that follow it
//! belong to that package until the next `PackageName:` or end of input.

use super::{SbomFormat, SbomReader};
use crate::error::{CheckerError, ParseErrorKind, Result};
use crate::model::LibraryComponent;

/// Locator values that carry no information.
const NO_VALUE: &[&str] = &["NONE", "NOASSERTION"];

/// Reader for SPDX tag-value documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdxTagValueReader;

impl SpdxTagValueReader {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Default)]
struct PendingPackage {
    name: String,
    version: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    references: Vec<String>,
}

impl PendingPackage {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn finish(self) -> Option<LibraryComponent> {
        let version = self.version.filter(|v| !v.is_empty())?;
        if self.name.is_empty() {
            return None;
        }
        let mut component = LibraryComponent::new(self.name, version);
        component.purl = self.purl;
        component.cpe = self.cpe;
        component.references = self.references;
        Some(component)
    }

    fn add_reference(&mut self, locator: &str) {
        if !locator.is_empty() && !NO_VALUE.contains(&locator) {
            self.references.push(locator.to_string());
        }
    }

    fn add_external_ref(&mut self, value: &str) {
        let mut parts = value.split_whitespace();
        let (Some(category), Some(ref_type)) = (parts.next(), parts.next()) else {
            return;
        };
        let locator = parts.collect::<Vec<_>>().join(" ");

        match (category, ref_type.to_lowercase().as_str()) {
            ("PACKAGE-MANAGER" | "PACKAGE_MANAGER", "purl") if !locator.is_empty() => {
                self.purl = Some(locator);
            }
            ("SECURITY", "cpe23type") if !locator.is_empty() => {
                self.cpe = Some(locator);
            }
            _ => self.add_reference(&locator),
        }
    }
}

impl SbomReader for SpdxTagValueReader {
    fn format(&self) -> SbomFormat {
        SbomFormat::SpdxTagValue
    }

    fn read_str(&self, content: &str) -> Result<Vec<LibraryComponent>> {
        let mut components = Vec::new();
        let mut current: Option<PendingPackage> = None;
        let mut saw_tag = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "SPDXVersion" | "DocumentName" | "SPDXID" | "DataLicense" => saw_tag = true,
                "PackageName" => {
                    saw_tag = true;
                    if let Some(done) = current.take().and_then(PendingPackage::finish) {
                        components.push(done);
                    }
                    current = Some(PendingPackage::named(value));
                }
                "PackageVersion" => {
                    if let Some(pkg) = current.as_mut() {
                        pkg.version = Some(value.to_string());
                    }
                }
                "PackageDownloadLocation" | "PackageHomePage" => {
                    if let Some(pkg) = current.as_mut() {
                        pkg.add_reference(value);
                    }
                }
                "ExternalRef" => {
                    if let Some(pkg) = current.as_mut() {
                        pkg.add_external_ref(value);
                    }
                }
                _ => {}
            }
        }

        if let Some(done) = current.and_then(PendingPackage::finish) {
            components.push(done);
        }

        if !saw_tag {
            return Err(CheckerError::parse(
                "SPDX tag-value",
                ParseErrorKind::TagValue("no SPDX tags found".to_string()),
            ));
        }
        Ok(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
SPDXVersion: SPDX-2.3
DataLicense: CC0-1.0
# firmware packages

PackageName: component-freertos
SPDXID: SPDXRef-freertos
PackageVersion: V10.4.3
PackageDownloadLocation: https://github.com/FreeRTOS/FreeRTOS-Kernel
PackageHomePage: NOASSERTION
ExternalRef: PACKAGE-MANAGER purl pkg:github/FreeRTOS/FreeRTOS-Kernel@V10.4.3

PackageName: lwip
PackageDownloadLocation: NONE

PackageName: mbedtls
PackageVersion: 2.16.2
ExternalRef: SECURITY cpe23Type cpe:2.3:a:arm:mbed_tls:2.16.2:*:*:*:*:*:*:*
ExternalRef: OTHER website https://www.trustedfirmware.org/projects/mbed-tls/
";

    #[test]
    fn test_reads_packages() {
        let components = SpdxTagValueReader::new().read_str(DOC).unwrap();
        assert_eq!(components.len(), 2);

        let freertos = &components[0];
        assert_eq!(freertos.name, "component-freertos");
        assert_eq!(freertos.declared_version, "V10.4.3");
        assert_eq!(
            freertos.purl.as_deref(),
            Some("pkg:github/FreeRTOS/FreeRTOS-Kernel@V10.4.3")
        );
        assert_eq!(
            freertos.references,
            vec!["https://github.com/FreeRTOS/FreeRTOS-Kernel".to_string()]
        );

        let mbedtls = &components[1];
        assert_eq!(
            mbedtls.cpe.as_deref(),
            Some("cpe:2.3:a:arm:mbed_tls:2.16.2:*:*:*:*:*:*:*")
        );
        assert_eq!(
            mbedtls.references,
            vec!["https://www.trustedfirmware.org/projects/mbed-tls/".to_string()]
        );
    }

    #[test]
    fn test_tags_before_first_package_are_ignored() {
        let doc = "SPDXVersion: SPDX-2.3\nPackageVersion: 1.0\n";
        let components = SpdxTagValueReader::new().read_str(doc).unwrap();
        assert!(components.is_empty());
    }

    #[test]
    fn test_non_spdx_text_is_an_error() {
        let err = SpdxTagValueReader::new()
            .read_str("hello world\nnothing: here\n")
            .unwrap_err();
        assert!(matches!(
            err,
            CheckerError::Parse {
                source: ParseErrorKind::TagValue(_),
                ..
            }
        ));
    }
}
