#![no_main]
use libfuzzer_sys::fuzz_target;
use fw_sbom_checker::parsers::{SbomReader, SpdxTagValueReader};

/// Fuzz the SPDX tag-value reader.
///
/// Prefixes input with a document header and an open package so the
/// package-level tags are reached.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let reader = SpdxTagValueReader::new();

        let _ = reader.read_str(s);

        if s.len() < 10_000 {
            let wrapped = format!(
                "SPDXVersion: SPDX-2.3\nDocumentName: fuzz\nPackageName: FreeRTOS\n{s}",
            );
            let _ = reader.read_str(&wrapped);
        }
    }
});
