//! Bordered terminal table with security release notes.

use super::{ReportContext, ReportError, ReportFormat, ReportGenerator};
use crate::model::{ReleaseRecord, ResolvedLibrary, SecurityLabel, Status, VulnerabilityReport};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const HEADERS: [&str; 4] = [
    "Library name",
    "Current version",
    "Latest available version",
    "Security of later versions",
];

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "magenta" => format!("\x1b[35m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Left-align `text` to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

const fn status_color(status: Status) -> &'static str {
    match status {
        Status::UpToDate => "green",
        Status::NeedsUpdate => "red",
        Status::Unknown => "yellow",
    }
}

const fn label_color(label: SecurityLabel) -> &'static str {
    match label {
        SecurityLabel::Secure => "green",
        SecurityLabel::NotSecure => "red",
        SecurityLabel::NotApplicable => "yellow",
    }
}

/// Table reporter for terminal output
#[derive(Debug, Clone, Copy)]
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn write_table(&self, out: &mut String, results: &[ResolvedLibrary]) -> std::fmt::Result {
        let rows: Vec<[String; 4]> = results
            .iter()
            .map(|lib| {
                [
                    lib.name.clone(),
                    lib.current_version.clone(),
                    lib.latest_version.to_string(),
                    lib.security_label.to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(UnicodeWidthStr::width);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
            }
        }

        let border = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );

        writeln!(out, "{border}")?;
        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| self.color(&pad(h, w), "magenta"))
            .collect();
        writeln!(out, "| {} |", header.join(" | "))?;
        writeln!(out, "{border}")?;

        for (lib, row) in results.iter().zip(&rows) {
            let colors = [
                "cyan",
                status_color(lib.status),
                "cyan",
                label_color(lib.security_label),
            ];
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .zip(colors)
                .map(|((cell, w), color)| self.color(&pad(cell, w), color))
                .collect();
            writeln!(out, "| {} |", cells.join(" | "))?;
        }
        writeln!(out, "{border}")
    }

    fn write_notes(&self, out: &mut String, results: &[ResolvedLibrary]) -> std::fmt::Result {
        let with_notes: Vec<&ResolvedLibrary> = results
            .iter()
            .filter(|lib| !lib.security_notes.is_empty())
            .collect();
        if with_notes.is_empty() {
            return writeln!(
                out,
                "\n{}",
                self.color("No security updates detected in later versions.", "dim")
            );
        }

        writeln!(out, "\n{}", self.color("Release notes with security updates:", "magenta"))?;
        for lib in with_notes {
            writeln!(out, "\n{}", self.color(&lib.name, "cyan"))?;
            for release in &lib.security_notes {
                self.write_release(out, release)?;
            }
        }
        Ok(())
    }

    fn write_release(&self, out: &mut String, release: &ReleaseRecord) -> std::fmt::Result {
        writeln!(
            out,
            "  {} ({})",
            self.color(&release.version, "yellow"),
            release.date().unwrap_or("date n/a")
        )?;
        let notes = if release.release_notes.trim().is_empty() {
            "No release notes available."
        } else {
            release.release_notes.as_str()
        };
        for line in notes.lines() {
            writeln!(out, "    - {line}")?;
        }
        let cves: Vec<&str> = release.cve_ids().collect();
        if !cves.is_empty() {
            writeln!(out, "    CVE: {}", cves.join(", "))?;
        }
        Ok(())
    }

    fn write_vulnerabilities(&self, out: &mut String, results: &[ResolvedLibrary]) -> std::fmt::Result {
        let scanned: Vec<(&str, &VulnerabilityReport)> = results
            .iter()
            .filter_map(|lib| lib.vulnerabilities.as_ref().map(|r| (lib.name.as_str(), r)))
            .collect();
        if scanned.is_empty() {
            return Ok(());
        }

        writeln!(out, "\n{}", self.color("Known vulnerabilities:", "magenta"))?;
        for (name, report) in scanned {
            writeln!(out, "\n{}", self.color(name, "cyan"))?;
            for findings in &report.sources {
                let via = findings.query.as_deref().unwrap_or("no applicable query");
                match &findings.error {
                    Some(error) => writeln!(
                        out,
                        "  {} via {}: {}",
                        findings.source,
                        via,
                        self.color(&format!("lookup failed ({error})"), "yellow")
                    )?,
                    None if findings.vulns.is_empty() => writeln!(
                        out,
                        "  {} via {}: {}",
                        findings.source,
                        via,
                        self.color("none found", "green")
                    )?,
                    None => {
                        writeln!(out, "  {} via {}:", findings.source, via)?;
                        for vuln in &findings.vulns {
                            let severity = vuln.severity.as_deref().unwrap_or("-");
                            let severity = match severity.to_lowercase().as_str() {
                                "critical" | "high" => self.color(severity, "red"),
                                "medium" | "moderate" => self.color(severity, "yellow"),
                                _ => severity.to_string(),
                            };
                            writeln!(out, "    {} [{}] {}", vuln.id, severity, vuln.summary)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn render(&self, results: &[ResolvedLibrary], context: &ReportContext) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "\n{}", self.color(&format!("SBOM: {}", context.sbom), "green"))?;
        self.write_table(&mut out, results)?;

        let needs_update = results.iter().filter(|lib| lib.needs_update()).count();
        let count_color = if needs_update > 0 { "red" } else { "green" };
        writeln!(
            out,
            "\nLibraries requiring updates: {}",
            self.color(&needs_update.to_string(), count_color)
        )?;

        let duplicated: Vec<&ResolvedLibrary> = results
            .iter()
            .filter(|lib| !lib.duplicate_versions.is_empty())
            .collect();
        for lib in duplicated {
            writeln!(
                out,
                "{}",
                self.color(
                    &format!(
                        "Catalog lists {} more than once: {}",
                        lib.name,
                        lib.duplicate_versions.join(", ")
                    ),
                    "yellow"
                )
            )?;
        }

        self.write_notes(&mut out, results)?;
        self.write_vulnerabilities(&mut out, results)?;
        Ok(out)
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate(&self, results: &[ResolvedLibrary], context: &ReportContext) -> Result<String, ReportError> {
        Ok(self.render(results, context)?)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}
