//! Domain entities shared by the triage and scanning pipelines.

use serde::{Deserialize, Serialize};

/// Raw issue data as exported from the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Issue title.
    pub title: String,
    /// Full issue body in the templated Markdown format.
    pub body: String,
}

/// Structured fields pulled out of a templated issue body.
///
/// A field is `None` when its section is missing, empty, or contains the
/// literal `_No response_` placeholder; downstream logic treats those cases
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Issue title, taken verbatim from the record.
    pub title: String,
    /// Bug category selected in the template.
    pub bug_category: Option<String>,
    /// Reporter-assigned severity label.
    pub severity: Option<String>,
    /// Free-text bug description.
    pub description: Option<String>,
    /// Steps to reproduce the problem.
    pub steps_to_reproduce: Option<String>,
    /// What the reporter expected to happen.
    pub expected_behavior: Option<String>,
    /// What actually happened.
    pub actual_behavior: Option<String>,
    /// Operating system the reporter ran on.
    pub os: Option<String>,
    /// Application version string.
    pub app_version: Option<String>,
    /// Error messages pasted by the reporter.
    pub error_message: Option<String>,
    /// Log file excerpts attached to the report.
    pub log_files: Option<String>,
    /// Contents of an attached Copilot error file, if any.
    pub copilot_error: Option<String>,
}

/// Result of matching a text blob against the pattern catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Name of the best-matching catalog entry, if any met its threshold.
    pub best_pattern: Option<String>,
    /// Fraction of the winning entry's keywords found in the text, in [0,1].
    pub confidence: f64,
}

impl ClassificationResult {
    /// A result with no matching pattern.
    pub fn none() -> Self {
        Self {
            best_pattern: None,
            confidence: 0.0,
        }
    }
}

/// Severity of a catalogued defect signature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Crash or data-loss class defect.
    Critical,
    /// Serious misbehavior with a workaround.
    High,
    /// Noticeable defect with limited impact.
    Medium,
    /// Cosmetic or diagnostic-quality defect.
    Low,
}

/// One concrete instance of a detected defect signature in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable identifier of the signature that fired (e.g. "BUG-001").
    pub bug_id: String,
    /// Severity drawn from the signature's static metadata.
    pub severity: Severity,
    /// Path of the file the signature fired against.
    pub file_path: String,
    /// 1-based line number of the first matching line.
    pub line_number: usize,
    /// Human-readable description of the defect.
    pub description: String,
    /// Evidence snippet, truncated at 200 characters.
    pub code_snippet: String,
    /// Always true for emitted findings; kept for report-schema stability.
    pub found: bool,
    /// Suggested remediation.
    pub recommendation: String,
}

/// Finding counts partitioned into the four severity buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Number of CRITICAL findings.
    pub critical: usize,
    /// Number of HIGH findings.
    pub high: usize,
    /// Number of MEDIUM findings.
    pub medium: usize,
    /// Number of LOW findings.
    pub low: usize,
}

impl SeverityCounts {
    /// Tally findings into severity buckets.
    pub fn tally(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    /// Combined CRITICAL and HIGH count, used as the automation gate.
    pub fn blocking(&self) -> usize {
        self.critical + self.high
    }
}

#[cfg(test)]
mod tests {
    use super::{Finding, Severity, SeverityCounts};

    fn finding(severity: Severity) -> Finding {
        Finding {
            bug_id: "BUG-000".to_string(),
            severity,
            file_path: "app/lib/Example.cpp".to_string(),
            line_number: 1,
            description: "example".to_string(),
            code_snippet: "code".to_string(),
            found: true,
            recommendation: "fix".to_string(),
        }
    }

    #[test]
    fn severity_serializes_screaming() {
        let json = serde_json::to_string(&Severity::Critical).expect("serialize");
        assert_eq!(json, "\"CRITICAL\"");
    }

    #[test]
    fn tally_partitions_by_severity() {
        let findings = vec![
            finding(Severity::Critical),
            finding(Severity::High),
            finding(Severity::High),
            finding(Severity::Low),
        ];
        let counts = SeverityCounts::tally(&findings);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.blocking(), 3);
    }
}
