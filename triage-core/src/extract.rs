//! Field extraction from templated issue bodies.
//!
//! Issue bodies follow the tracker's form convention: a `### Field Name`
//! heading, a blank line, then free text running until the next heading or
//! the end of the body.

use regex::Regex;

use crate::domain::{ExtractedFields, IssueRecord};

/// Placeholder the tracker inserts for a skipped optional form field.
const NO_RESPONSE: &str = "_No response_";

/// Extract one named section from an issue body.
///
/// Returns `None` when the section is missing, empty, or contains the
/// `_No response_` placeholder. A missing field is a normal outcome, not an
/// error.
pub fn extract_field(body: &str, field_name: &str) -> Option<String> {
    // The delimiter group consumes the next heading instead of looking ahead;
    // each field is extracted with a fresh search, so this is sound.
    let pattern = format!(r"(?s)### {}\s*\n\s*\n(.*?)(\n###|\z)", regex::escape(field_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(body)?.get(1)?.as_str().trim().to_string();
    if value.is_empty() || value == NO_RESPONSE {
        None
    } else {
        Some(value)
    }
}

/// Extract the full fixed field set from an issue record.
pub fn extract_fields(record: &IssueRecord) -> ExtractedFields {
    let body = record.body.as_str();
    ExtractedFields {
        title: record.title.clone(),
        bug_category: extract_field(body, "Bug Category"),
        severity: extract_field(body, "Severity"),
        description: extract_field(body, "Bug Description"),
        steps_to_reproduce: extract_field(body, "Steps to Reproduce"),
        expected_behavior: extract_field(body, "Expected Behavior"),
        actual_behavior: extract_field(body, "Actual Behavior"),
        os: extract_field(body, "Operating System"),
        app_version: extract_field(body, "AI File Sorter Version"),
        error_message: extract_field(body, "Error Messages"),
        log_files: extract_field(body, "Log Files"),
        copilot_error: extract_field(body, "Copilot Error File"),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_field, extract_fields};
    use crate::domain::IssueRecord;

    #[test]
    fn extracts_section_followed_by_heading() {
        let body = "### Severity\n\nHigh\n\n### Bug Description\n\nIt crashes.";
        assert_eq!(extract_field(body, "Severity").as_deref(), Some("High"));
    }

    #[test]
    fn extracts_trailing_section_without_next_heading() {
        let body = "### Bug Description\n\nCrashes on startup with a Qt error.";
        assert_eq!(
            extract_field(body, "Bug Description").as_deref(),
            Some("Crashes on startup with a Qt error.")
        );
    }

    #[test]
    fn no_response_placeholder_is_absent() {
        let body = "### Log Files\n\n_No response_\n\n### Severity\n\nLow";
        assert_eq!(extract_field(body, "Log Files"), None);
    }

    #[test]
    fn empty_section_is_absent() {
        let body = "### Log Files\n\n\n### Severity\n\nLow";
        assert_eq!(extract_field(body, "Log Files"), None);
    }

    #[test]
    fn missing_section_is_absent() {
        assert_eq!(extract_field("no sections here", "Severity"), None);
    }

    #[test]
    fn multiline_section_is_preserved() {
        let body = "### Steps to Reproduce\n\n1. Open app\n2. Drop a file\n\n### Severity\n\nHigh";
        assert_eq!(
            extract_field(body, "Steps to Reproduce").as_deref(),
            Some("1. Open app\n2. Drop a file")
        );
    }

    #[test]
    fn extracts_full_field_set() {
        let record = IssueRecord {
            title: "App crashes on launch".to_string(),
            body: "### Bug Category\n\nApplication Crash/Won't Start\n\n\
                   ### Severity\n\nCritical\n\n\
                   ### Operating System\n\nWindows 11\n\n\
                   ### Log Files\n\n_No response_"
                .to_string(),
        };

        let fields = extract_fields(&record);
        assert_eq!(fields.title, "App crashes on launch");
        assert_eq!(
            fields.bug_category.as_deref(),
            Some("Application Crash/Won't Start")
        );
        assert_eq!(fields.severity.as_deref(), Some("Critical"));
        assert_eq!(fields.os.as_deref(), Some("Windows 11"));
        assert_eq!(fields.log_files, None);
        assert_eq!(fields.description, None);
    }
}
