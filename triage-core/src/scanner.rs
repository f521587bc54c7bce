//! Signature scanning and finding aggregation.

use std::path::{Path, PathBuf};

use crate::domain::Finding;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::report::DiagnosticReport;
use crate::signature::SignatureCheck;
use crate::signatures::build_signature_checks;

/// File name of the persisted scan report, relative to the scanned root.
pub const REPORT_FILE_NAME: &str = "diagnostic_report.json";

/// Runs the signature catalog against a source tree.
///
/// Each check executes in isolation: a missing target file or a failing
/// rule is logged and skipped, and never aborts the rest of the scan.
pub struct DiagnosticScanner<F: FileSystem> {
    fs: F,
    checks: Vec<Box<dyn SignatureCheck>>,
}

impl<F: FileSystem> DiagnosticScanner<F> {
    /// Create a scanner over the built-in signature catalog.
    pub fn new(fs: F) -> Self {
        Self::with_checks(fs, build_signature_checks())
    }

    /// Create a scanner over a custom check catalog.
    pub fn with_checks(fs: F, checks: Vec<Box<dyn SignatureCheck>>) -> Self {
        Self { fs, checks }
    }

    /// Run every check against `root` and aggregate the findings.
    ///
    /// Findings preserve check-declaration order. The returned report is
    /// complete; persisting it is a separate step ([`write_report`]).
    pub fn run(&self, root: &Path) -> DiagnosticReport {
        let mut findings = Vec::new();

        for check in &self.checks {
            let path = root.join(check.target());
            if !self.fs.is_file(&path) {
                tracing::warn!(check = check.id(), path = %path.display(), "target file not found, skipping check");
                continue;
            }

            let content = match self.fs.read_to_string(&path) {
                Ok(content) => content,
                Err(error) => {
                    tracing::warn!(check = check.id(), %error, "failed to read target file, skipping check");
                    continue;
                }
            };

            let mut matches = match check.evaluate(&content) {
                Ok(matches) => matches,
                Err(error) => {
                    tracing::warn!(check = check.id(), %error, "check failed, skipping");
                    continue;
                }
            };

            if let Some(limit) = check.max_findings() {
                matches.truncate(limit);
            }

            for m in matches {
                findings.push(Finding {
                    bug_id: check.id().to_string(),
                    severity: check.severity(),
                    file_path: path.display().to_string(),
                    line_number: m.line_number,
                    description: check.description().to_string(),
                    code_snippet: m.snippet,
                    found: true,
                    recommendation: check.recommendation().to_string(),
                });
            }
        }

        DiagnosticReport::new(root, findings)
    }
}

/// Serialize the report to `<root>/diagnostic_report.json`.
///
/// The report is built fully in memory and written in one shot, so a
/// failing check can never leave a partially written artifact behind.
pub fn write_report(report: &DiagnosticReport, root: &Path) -> Result<PathBuf> {
    let path = root.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
