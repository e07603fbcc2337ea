#![no_main]
use libfuzzer_sys::fuzz_target;
use fw_sbom_checker::parsers::{CycloneDxReader, SbomReader};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX JSON reader.
///
/// Also wraps input as a component list to get past the envelope.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let reader = CycloneDxReader::new();

        let _ = reader.read_str(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"{{"bomFormat":"CycloneDX","specVersion":"1.5","components":[{s}]}}"#,
            );
            let _ = reader.read_str(&wrapped);
        }
    }
});
