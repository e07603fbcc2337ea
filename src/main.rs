//! fw-sbom-checker: firmware SBOM update and vulnerability checker
//!
//! Reconciles the firmware libraries declared in CycloneDX / SPDX SBOMs
//! against a release catalog and vulnerability feeds.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fw_sbom_checker::{
    cli,
    config::{generate_example_config, AppConfig, CliOverrides},
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  CycloneDX: JSON",
        "\n  SPDX:      tag-value",
        "\n\nOutput Formats:",
        "\n  table, json",
        "\n\nVulnerability Sources:",
        "\n  OSV, NVD (with the 'enrichment' feature)"
    )
}

#[derive(Parser)]
#[command(name = "fw-sbom-checker")]
#[command(version, long_version = build_long_version())]
#[command(about = "Check firmware SBOMs for security updates and known vulnerabilities", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  A library needs a security update (with --fail-on-update)
    3  Error occurred

EXAMPLES:
    # Check every SBOM in the configured sbom_dir
    fw-sbom-checker check

    # CI gate on one SBOM, with vulnerability lookups
    fw-sbom-checker --enrich check firmware.spdx --fail-on-update

    # Which boards still ship a FreeRTOS that needs updating?
    fw-sbom-checker search FreeRTOS sboms/")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Release catalog: JSON, or SQLite for .db/.sqlite/.sqlite3 (default: releases.json)
    #[arg(long, global = true, env = "FW_SBOM_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, global = true)]
    format: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,

    /// Query OSV and NVD for known vulnerabilities
    #[arg(long, global = true)]
    enrich: bool,

    /// Request timeout in seconds for every network lookup
    #[arg(long, global = true)]
    api_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile SBOMs against the release catalog
    Check {
        /// SBOM files or directories (default: sbom_dir from config)
        paths: Vec<PathBuf>,

        /// Exit with code 1 if any library needs a security update
        #[arg(long)]
        fail_on_update: bool,
    },

    /// List SBOMs in which a library needs a security update
    Search {
        /// Library name (e.g. FreeRTOS)
        library: String,

        /// SBOM files or directories (default: sbom_dir from config)
        paths: Vec<PathBuf>,
    },

    /// List the libraries known to the release catalog
    Libraries,

    /// Print an example configuration file
    Config,
}

impl Cli {
    /// Values given on the command line, applied over the config file.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            catalog: self.catalog.clone(),
            format: self.format,
            output_file: self.output_file.clone(),
            no_color: self.no_color,
            enrich: self.enrich,
            api_timeout_secs: self.api_timeout,
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let log_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &cli.overrides());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    match &cli.command {
        Commands::Check {
            paths,
            fail_on_update,
        } => cli::run_check(
            &config,
            &cli::CheckOptions {
                paths: paths.clone(),
                fail_on_update: *fail_on_update,
                quiet: cli.quiet,
            },
        ),
        Commands::Search { library, paths } => cli::run_search(&config, library, paths, cli.quiet),
        Commands::Libraries => cli::run_libraries(&config),
        Commands::Config => {
            print!("{}", generate_example_config());
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}
