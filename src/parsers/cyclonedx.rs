//! CycloneDX JSON reader.
//!
//! Only the component fields reconciliation needs are deserialized; every
//! other part of the BOM is ignored.

use super::{SbomFormat, SbomReader};
use crate::error::{CheckerError, ParseErrorKind, Result};
use crate::model::LibraryComponent;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    #[serde(default)]
    components: Option<Vec<CycloneDxComponent>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxComponent {
    name: Option<String>,
    version: Option<String>,
    purl: Option<String>,
    cpe: Option<String>,
    #[serde(default)]
    external_references: Option<Vec<CycloneDxExternalReference>>,
}

#[derive(Debug, Deserialize)]
struct CycloneDxExternalReference {
    url: Option<String>,
}

/// Reader for CycloneDX JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycloneDxReader;

impl CycloneDxReader {
    pub fn new() -> Self {
        Self
    }
}

impl SbomReader for CycloneDxReader {
    fn format(&self) -> SbomFormat {
        SbomFormat::CycloneDxJson
    }

    fn read_str(&self, content: &str) -> Result<Vec<LibraryComponent>> {
        let bom: CycloneDxBom = serde_json::from_str(content).map_err(|e| {
            CheckerError::parse("CycloneDX JSON", ParseErrorKind::InvalidJson(e.to_string()))
        })?;

        Ok(bom
            .components
            .unwrap_or_default()
            .into_iter()
            .filter_map(convert_component)
            .collect())
    }
}

fn convert_component(raw: CycloneDxComponent) -> Option<LibraryComponent> {
    let name = raw.name.filter(|n| !n.trim().is_empty())?;
    let version = raw.version.filter(|v| !v.trim().is_empty())?;

    let mut component = LibraryComponent::new(name.trim(), version.trim());
    component.purl = raw.purl.filter(|p| !p.is_empty());
    component.cpe = raw.cpe.filter(|c| !c.is_empty());
    component.references = raw
        .external_references
        .unwrap_or_default()
        .into_iter()
        .filter_map(|r| r.url)
        .filter(|u| !u.is_empty())
        .collect();
    Some(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOM: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "components": [
            {
                "type": "library",
                "name": "FreeRTOS",
                "version": "V10.4.3",
                "purl": "pkg:github/FreeRTOS/FreeRTOS-Kernel",
                "externalReferences": [
                    {"type": "vcs", "url": "https://github.com/FreeRTOS/FreeRTOS-Kernel"},
                    {"type": "website"}
                ]
            },
            {"type": "library", "name": "LwIP"},
            {"type": "library", "version": "1.0"},
            {
                "type": "library",
                "name": "mbedTLS",
                "version": "2.16.2",
                "cpe": "cpe:2.3:a:arm:mbed_tls:2.16.2:*:*:*:*:*:*:*"
            }
        ]
    }"#;

    #[test]
    fn test_reads_components() {
        let components = CycloneDxReader::new().read_str(BOM).unwrap();
        assert_eq!(components.len(), 2);

        let freertos = &components[0];
        assert_eq!(freertos.name, "FreeRTOS");
        assert_eq!(freertos.declared_version, "V10.4.3");
        assert_eq!(
            freertos.purl.as_deref(),
            Some("pkg:github/FreeRTOS/FreeRTOS-Kernel")
        );
        assert_eq!(
            freertos.references,
            vec!["https://github.com/FreeRTOS/FreeRTOS-Kernel".to_string()]
        );

        assert_eq!(components[1].name, "mbedTLS");
        assert!(components[1].cpe.is_some());
    }

    #[test]
    fn test_missing_components_is_empty() {
        let components = CycloneDxReader::new()
            .read_str(r#"{"bomFormat": "CycloneDX"}"#)
            .unwrap();
        assert!(components.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = CycloneDxReader::new().read_str("PackageName: lwip").unwrap_err();
        assert!(matches!(
            err,
            CheckerError::Parse {
                source: ParseErrorKind::InvalidJson(_),
                ..
            }
        ));
    }
}
