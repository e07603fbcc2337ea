//! Pipeline and CLI integration tests.
//!
//! These tests exercise the full read → reconcile → report pipeline with
//! the fixture SBOMs and release catalog under `tests/fixtures`.

use fw_sbom_checker::catalog::{JsonCatalog, ReleaseCatalog};
use fw_sbom_checker::cli::{run_check, CheckOptions};
use fw_sbom_checker::config::AppConfig;
use fw_sbom_checker::model::{LatestVersion, ResolvedLibrary, SecurityLabel, Status};
use fw_sbom_checker::parsers::{read_components, LibraryFilter};
use fw_sbom_checker::pipeline::{
    discover_sboms, exit_codes, load_sbom, render_report, Reconciler, RunSummary,
};
use fw_sbom_checker::reports::{ReportFormat, ReportGenerator, ReportContext, TableReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn reconciler() -> Reconciler {
    let catalog = JsonCatalog::load(&fixture_path("releases.json")).expect("catalog fixture");
    Reconciler::new(Arc::new(catalog))
}

fn find<'a>(results: &'a [ResolvedLibrary], name: &str) -> &'a ResolvedLibrary {
    results
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("{name} missing from results"))
}

// ============================================================================
// Read Stage
// ============================================================================

mod read_stage {
    use super::*;

    #[test]
    fn discovers_both_formats() {
        let found = discover_sboms(&fixture_path("sboms")).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["board_a.json", "board_b.spdx"]);
    }

    #[test]
    fn cyclonedx_keeps_monitored_libraries() {
        let libs =
            read_components(&fixture_path("sboms/board_a.json"), &LibraryFilter::default())
                .unwrap();
        let names: Vec<_> = libs.iter().map(|l| l.name.as_str()).collect();
        // zlib is unmonitored, STemWin has no version
        assert_eq!(names, vec!["FreeRTOS", "FatFs"]);
        assert_eq!(
            libs[0].purl.as_deref(),
            Some("pkg:github/FreeRTOS/FreeRTOS-Kernel@V10.4.3")
        );
        assert_eq!(libs[0].references.len(), 1);
    }

    #[test]
    fn spdx_canonicalizes_and_dedups() {
        let libs =
            read_components(&fixture_path("sboms/board_b.spdx"), &LibraryFilter::default())
                .unwrap();
        let summary: Vec<_> = libs
            .iter()
            .map(|l| (l.name.as_str(), l.declared_version.as_str()))
            .collect();
        assert_eq!(summary, vec![("LwIP", "2.1.2"), ("FreeRTOS", "v10.5.0")]);
        assert_eq!(
            libs[0].references,
            vec!["https://git.savannah.nongnu.org/git/lwip.git".to_string()]
        );
    }

    #[test]
    fn broken_json_is_an_error_with_path() {
        let err = load_sbom(&fixture_path("broken.json"), &LibraryFilter::default(), true)
            .unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}

// ============================================================================
// Reconcile Stage
// ============================================================================

mod reconcile_stage {
    use super::*;

    #[test]
    fn board_a_against_catalog() {
        let loaded =
            load_sbom(&fixture_path("sboms/board_a.json"), &LibraryFilter::default(), true)
                .unwrap();
        let results = reconciler().reconcile(&loaded.libraries);

        let freertos = find(&results, "FreeRTOS");
        assert_eq!(freertos.current_version, "10.4.3");
        assert_eq!(freertos.status, Status::NeedsUpdate);
        assert_eq!(freertos.security_label, SecurityLabel::NotSecure);
        assert_eq!(freertos.security_notes.len(), 1);
        assert_eq!(freertos.security_notes[0].version, "V10.4.4");
        assert_eq!(
            freertos.security_notes[0].cve_ids().collect::<Vec<_>>(),
            vec!["CVE-2021-31571", "CVE-2021-31572"]
        );
        assert_eq!(freertos.latest_version, LatestVersion::Known("10.5.0".into()));
        assert_eq!(freertos.latest_release_date.as_deref(), Some("2022-09-16"));

        let fatfs = find(&results, "FatFs");
        assert_eq!(fatfs.status, Status::UpToDate);
        assert_eq!(fatfs.security_label, SecurityLabel::Secure);
        assert_eq!(fatfs.latest_version, LatestVersion::Known("R0.15".into()));
    }

    #[test]
    fn board_b_against_catalog() {
        let loaded =
            load_sbom(&fixture_path("sboms/board_b.spdx"), &LibraryFilter::default(), true)
                .unwrap();
        let results = reconciler().reconcile(&loaded.libraries);

        assert_eq!(find(&results, "LwIP").status, Status::NeedsUpdate);
        assert_eq!(find(&results, "FreeRTOS").status, Status::UpToDate);

        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.libraries, 2);
        assert_eq!(summary.needs_update, 1);
        assert_eq!(summary.up_to_date, 1);
    }

    #[test]
    fn catalog_lists_its_libraries() {
        let catalog = JsonCatalog::load(&fixture_path("releases.json")).unwrap();
        assert_eq!(catalog.library_names(), vec!["FreeRTOS", "LwIP", "FatFs"]);
    }
}

// ============================================================================
// Report Stage
// ============================================================================

mod report_stage {
    use super::*;

    fn board_a_results() -> Vec<ResolvedLibrary> {
        let loaded =
            load_sbom(&fixture_path("sboms/board_a.json"), &LibraryFilter::default(), true)
                .unwrap();
        reconciler().reconcile(&loaded.libraries)
    }

    #[test]
    fn table_report_lists_security_notes() {
        let report = TableReporter::new()
            .no_color()
            .generate(&board_a_results(), &ReportContext::new("board_a.json"))
            .unwrap();

        assert!(report.contains("Library name"));
        assert!(report.contains("Security of later versions"));
        assert!(report.contains("needs-update"));
        assert!(report.contains("not-secure"));
        assert!(report.contains("Libraries requiring updates: 1"));
        assert!(report.contains("V10.4.4 (2021-05-28)"));
        assert!(report.contains("    - Fix integer overflow in queue creation"));
        assert!(report.contains("CVE-2021-31571"));
        assert!(!report.contains("\x1b["));
    }

    #[test]
    fn json_report_round_trips_results() {
        let results = board_a_results();
        let report = render_report(ReportFormat::Json, false, "board_a.json", &results).unwrap();

        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["sbom"], "board_a.json");
        let parsed: Vec<ResolvedLibrary> =
            serde_json::from_value(value["libraries"].clone()).unwrap();
        assert_eq!(parsed, results);
    }
}

// ============================================================================
// CLI Handlers
// ============================================================================

mod cli_handlers {
    use super::*;

    fn config(output: &Path) -> AppConfig {
        let mut config = AppConfig::builder()
            .catalog(fixture_path("releases.json"))
            .sbom_dir(fixture_path("sboms"))
            .output_format(ReportFormat::Json)
            .no_color(true)
            .build();
        config.output.file = Some(output.to_path_buf());
        config
    }

    #[test]
    fn check_reports_every_sbom() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");

        let code = run_check(
            &config(&output),
            &CheckOptions {
                quiet: true,
                fail_on_update: true,
                ..CheckOptions::default()
            },
        )
        .unwrap();
        assert_eq!(code, exit_codes::NEEDS_UPDATE);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let reports = value.as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["sbom"], "board_a.json");
        assert_eq!(reports[1]["sbom"], "board_b.spdx");
    }

    #[test]
    fn check_with_unreadable_sbom_exits_with_error_code() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");

        let code = run_check(
            &config(&output),
            &CheckOptions {
                paths: vec![fixture_path("sboms/board_a.json"), fixture_path("broken.json")],
                quiet: true,
                fail_on_update: false,
            },
        )
        .unwrap();
        assert_eq!(code, exit_codes::ERROR);
        // the readable SBOM is still reported
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["sbom"], "board_a.json");
    }

    #[test]
    fn check_fails_when_catalog_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir.path().join("report.json"));
        config.catalog = Some(dir.path().join("nope.json"));

        assert!(run_check(&config, &CheckOptions::default()).is_err());
    }
}
