//! Parsing of semi-structured incident record files.
//!
//! Incident records are Markdown files emitted by the application's error
//! reporter, carrying one `Label: value` line per field. Each label is
//! captured independently; absent labels serialize as `null`.

use regex::Regex;
use serde::Serialize;

use crate::error::Result;

/// Structured view of an incident record file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentRecord {
    /// Unique identifier assigned by the error reporter.
    pub error_id: Option<String>,
    /// Error category label.
    pub category: Option<String>,
    /// Severity label.
    pub severity: Option<String>,
    /// Numeric or symbolic error code.
    pub error_code: Option<String>,
    /// Human-readable error message.
    pub message: Option<String>,
    /// Source file the error was raised from.
    pub source_file: Option<String>,
    /// Source line number, captured as text.
    pub source_line: Option<String>,
    /// Function the error was raised from.
    pub function: Option<String>,
}

/// Parse an incident record from file content.
pub fn parse_incident_record(content: &str) -> Result<IncidentRecord> {
    Ok(IncidentRecord {
        error_id: capture_line(content, r"Error ID: (.+)")?,
        category: capture_line(content, r"Category: (.+)")?,
        severity: capture_line(content, r"Severity: (.+)")?,
        error_code: capture_line(content, r"Error Code: (.+)")?,
        message: capture_line(content, r"Message: (.+)")?,
        source_file: capture_line(content, r"File: (.+)")?,
        source_line: capture_line(content, r"Line: (\d+)")?,
        function: capture_line(content, r"Function: (.+)")?,
    })
}

fn capture_line(content: &str, pattern: &str) -> Result<Option<String>> {
    let re = Regex::new(pattern)?;
    Ok(re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}
