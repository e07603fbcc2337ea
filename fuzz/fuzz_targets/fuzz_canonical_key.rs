#![no_main]
use libfuzzer_sys::fuzz_target;
use fw_sbom_checker::resolve::{canonical_key, compare_versions, normalize};

/// Fuzz version normalization and ordering.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = normalize(s);
        assert_eq!(normalize(normalized.as_str()), normalized);

        let key = canonical_key(s);
        let _ = key.is_numeric_release();

        if let Some((a, b)) = s.split_once('|') {
            assert_eq!(compare_versions(a, b), compare_versions(b, a).reverse());
        }
    }
});
