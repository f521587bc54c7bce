//! Report structures and formatting for triage and scan outputs.
//!
//! Rendering is pure text templating over finished analysis structures;
//! no classification or detection logic runs here.

use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{Finding, Severity, SeverityCounts};
use crate::triage::TriageAnalysis;

/// Aggregated result of one scan run, the terminal artifact of the
/// scanning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    /// Local time the scan completed, ISO-8601.
    pub timestamp: String,
    /// Repository root the scan ran against.
    pub repository: String,
    /// Total number of findings.
    pub total_issues: usize,
    /// Finding counts per severity bucket.
    pub by_severity: SeverityCounts,
    /// Findings in check-declaration order.
    pub findings: Vec<Finding>,
}

impl DiagnosticReport {
    /// Build a report from collected findings.
    pub fn new(root: &Path, findings: Vec<Finding>) -> Self {
        Self {
            timestamp: chrono::Local::now()
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            repository: root.display().to_string(),
            total_issues: findings.len(),
            by_severity: SeverityCounts::tally(&findings),
            findings,
        }
    }

    /// True when any CRITICAL or HIGH finding exists; used by callers as a
    /// non-zero completion-status gate.
    pub fn has_blocking_findings(&self) -> bool {
        self.by_severity.blocking() > 0
    }
}

/// Render any serializable report payload as pretty JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Render a triage analysis as a Markdown comment ready for the tracker.
pub fn render_triage_markdown(analysis: &TriageAnalysis) -> String {
    let fields = &analysis.fields;
    let category = fields.bug_category.as_deref().unwrap_or("Unknown");
    let pattern = analysis.pattern_detected.as_deref();
    let confidence_percent = analysis.pattern_confidence * 100.0;

    let mut output = String::new();
    let _ = writeln!(output, "## 🔍 Initial Triage Analysis\n");
    let _ = writeln!(
        output,
        "**Priority:** {} - {}",
        analysis.priority,
        priority_description(&analysis.priority)
    );
    let _ = writeln!(output, "**Category:** {category}");
    let _ = writeln!(
        output,
        "**Pattern Detected:** {} (confidence: {confidence_percent:.0}%)\n",
        pattern.unwrap_or("None")
    );
    let _ = writeln!(output, "### Quick Summary");
    let _ = writeln!(output, "{}\n", quick_summary(analysis));

    if let Some(pattern) = pattern {
        let solution = analysis.suggested_solution.as_deref().unwrap_or_default();
        let reference = analysis.reference_doc.as_deref().unwrap_or_default();
        let _ = writeln!(output, "### Root Cause Analysis");
        let _ = writeln!(
            output,
            "This appears to match a known pattern: **{}**\n",
            pattern_display_name(pattern)
        );
        let _ = writeln!(output, "**Hypothesis:** {solution}\n");
        let _ = writeln!(output, "**Reference Documentation:** [{reference}]({reference})\n");
    }

    let _ = writeln!(output, "### Immediate Actions (For User)");
    let _ = writeln!(output, "Please try the following and report back:");
    for step in user_steps(pattern) {
        let _ = writeln!(output, "{step}");
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "### For Developers");
    let _ = writeln!(output, "**Affected Components:**");
    let _ = writeln!(output, "{}\n", affected_components(category));
    let _ = writeln!(
        output,
        "**Complexity Estimate:** {}\n",
        complexity_estimate(pattern, fields.severity.as_deref().unwrap_or(""))
    );
    let _ = writeln!(output, "---");
    let _ = writeln!(
        output,
        "*This analysis was performed using the Issue Triage Guide. If you need \
         clarification or have additional information, please comment below.*"
    );
    output
}

/// Render a console summary of a scan report.
pub fn render_scan_summary(report: &DiagnosticReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "AI File Sorter - Diagnostic Scan");
    let _ = writeln!(output, "Repository: {}", report.repository);
    let _ = writeln!(output, "Timestamp: {}\n", report.timestamp);
    let _ = writeln!(output, "Results:");
    let _ = writeln!(output, "  CRITICAL: {} issues", report.by_severity.critical);
    let _ = writeln!(output, "  HIGH:     {} issues", report.by_severity.high);
    let _ = writeln!(output, "  MEDIUM:   {} issues", report.by_severity.medium);
    let _ = writeln!(output, "  LOW:      {} issues", report.by_severity.low);
    let _ = writeln!(output, "  TOTAL:    {} issues found", report.total_issues);

    let critical: Vec<&Finding> = report
        .findings
        .iter()
        .filter(|finding| finding.severity == Severity::Critical)
        .collect();
    if !critical.is_empty() {
        let _ = writeln!(output, "\nCRITICAL ISSUES (fix immediately):");
        for finding in critical {
            let _ = writeln!(output, "  - {}: {}", finding.bug_id, finding.description);
            let _ = writeln!(output, "    File: {}:{}", finding.file_path, finding.line_number);
            let _ = writeln!(output, "    Fix: {}", finding.recommendation);
        }
    }

    output
}

fn priority_description(priority: &str) -> &'static str {
    match priority {
        "P0" => "Critical - Fix immediately",
        "P1" => "High - Fix in next release",
        "P2" => "Medium - Fix in upcoming releases",
        "P3" => "Low - Fix when convenient",
        _ => "Unknown",
    }
}

/// One-line summary: category, OS, version, and the first sentence of the
/// description truncated to 100 characters.
fn quick_summary(analysis: &TriageAnalysis) -> String {
    let fields = &analysis.fields;
    let category = fields.bug_category.as_deref().unwrap_or("Unknown");
    let os = fields.os.as_deref().unwrap_or("Unknown OS");
    let version = fields.app_version.as_deref().unwrap_or("unknown version");
    let description = fields
        .description
        .as_deref()
        .unwrap_or("No description provided");

    let first_sentence = description.split('.').next().unwrap_or(description);
    let summary: String = first_sentence.chars().take(100).collect();

    format!("{category} on {os} (v{version}): {summary}")
}

/// Display form of a pattern name: underscores to spaces, title-cased.
fn pattern_display_name(pattern: &str) -> String {
    pattern
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numbered remediation steps per detected pattern, with a generic default
/// for unmatched or unrecognized patterns.
fn user_steps(pattern: Option<&str>) -> &'static [&'static str] {
    match pattern {
        Some("dll_version_mismatch") => &[
            "1. Verify you're launching `StartAiFileSorter.exe`, NOT `aifilesorter.exe` directly",
            "2. Check your system PATH for multiple Qt installations",
            "3. Review the DLL search path setup in error logs",
        ],
        Some("ggml_function_missing") => &[
            "1. Update to the latest release version",
            "2. If building from source, rebuild llama.cpp: `./app/scripts/build_llama_*.sh`",
            "3. Then rebuild the application",
        ],
        Some("permission_denied") => &[
            "1. Check file and folder permissions on the target directory",
            "2. Try running the application as Administrator (Windows) or with sudo (Linux)",
            "3. Check if antivirus is blocking file operations",
        ],
        Some("api_rate_limit") => &[
            "1. Verify you're using a valid API key",
            "2. Check Tools → API Usage Statistics for quota information",
            "3. Reduce the number of files per batch",
        ],
        _ => &[
            "1. Verify you're using the latest version of AI File Sorter",
            "2. Check the logs directory for detailed error information",
            "3. Try the operation with a smaller set of files to isolate the issue",
        ],
    }
}

/// Component-ownership table, scanned in declaration order; the first key
/// found as a substring of the category wins.
const COMPONENT_MAP: &[(&str, &[&str])] = &[
    ("Application Crash", &["main.cpp", "StartupManager"]),
    ("DLL/Library Loading", &["startapp_windows.cpp", "DLL loading"]),
    ("Qt/UI Issue", &["Qt widgets", "UI dialogs"]),
    ("Categorization", &["LLMClient", "ConsistencyPassService"]),
    ("File Sorting", &["FileOperations", "MovableCategorizedFile"]),
    ("Database", &["DatabaseManager", "SQLite operations"]),
    ("API Integration", &["OpenAIClient", "GeminiClient", "ApiUsageStatistics"]),
];

fn affected_components(category: &str) -> String {
    let category_lower = category.to_lowercase();
    for (key, components) in COMPONENT_MAP {
        if category_lower.contains(&key.to_lowercase()) {
            return components
                .iter()
                .map(|component| format!("- {component}"))
                .collect::<Vec<_>>()
                .join("\n");
        }
    }
    "- To be determined".to_string()
}

fn complexity_estimate(pattern: Option<&str>, severity: &str) -> &'static str {
    if pattern.is_some() {
        return "Low-Medium (known pattern)";
    }
    if severity.contains("Critical") || severity.contains("High") {
        return "Medium-High (high severity issue)";
    }
    "To be determined after investigation"
}
