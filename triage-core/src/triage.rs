//! Issue triage analysis: field extraction, classification, and priority.

use serde::Serialize;

use crate::catalog::{PatternCatalogEntry, PriorityMatrix};
use crate::classifier::{classify, resolve_priority};
use crate::domain::{ExtractedFields, IssueRecord};
use crate::extract::extract_fields;

/// Full triage analysis of one issue report.
///
/// Built once and then only read; rendering consumes this structure without
/// re-running any classification logic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageAnalysis {
    /// Structured fields extracted from the issue body.
    pub fields: ExtractedFields,
    /// Resolved priority label (P0..P3).
    pub priority: String,
    /// Best-matching known pattern, if any.
    pub pattern_detected: Option<String>,
    /// Confidence of the detected pattern, 0.0 when none matched.
    pub pattern_confidence: f64,
    /// Suggested solution from the matched catalog entry. Omitted from JSON
    /// output when no pattern matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_solution: Option<String>,
    /// Reference document from the matched catalog entry. Omitted from JSON
    /// output when no pattern matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_doc: Option<String>,
    /// Whether the reporter attached a Copilot error file.
    pub has_copilot_error: bool,
    /// Whether the reporter attached log excerpts.
    pub has_logs: bool,
}

/// Analyze an issue record against the given catalogs.
pub fn analyze_issue(
    record: &IssueRecord,
    patterns: &[PatternCatalogEntry],
    matrix: &PriorityMatrix,
) -> TriageAnalysis {
    let fields = extract_fields(record);

    let priority = resolve_priority(
        matrix,
        fields.bug_category.as_deref().unwrap_or(""),
        fields.severity.as_deref().unwrap_or(""),
    );

    let classification = classify(patterns, &classification_text(&fields));
    let matched_entry = classification
        .best_pattern
        .as_deref()
        .and_then(|name| patterns.iter().find(|entry| entry.name == name));

    TriageAnalysis {
        has_copilot_error: fields.copilot_error.is_some(),
        has_logs: fields.log_files.is_some(),
        priority,
        pattern_detected: classification.best_pattern.clone(),
        pattern_confidence: classification.confidence,
        suggested_solution: matched_entry.map(|entry| entry.solution.to_string()),
        reference_doc: matched_entry.map(|entry| entry.reference.to_string()),
        fields,
    }
}

/// Space-joined text the classifier runs over: title, description, error
/// messages, actual behavior, and logs, skipping absent fields.
fn classification_text(fields: &ExtractedFields) -> String {
    let parts = [
        Some(fields.title.as_str()),
        fields.description.as_deref(),
        fields.error_message.as_deref(),
        fields.actual_behavior.as_deref(),
        fields.log_files.as_deref(),
    ];
    parts
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::analyze_issue;
    use crate::catalog::{default_patterns, default_priority_matrix};
    use crate::domain::IssueRecord;

    fn crash_record() -> IssueRecord {
        IssueRecord {
            title: "App crashes on launch".to_string(),
            body: "### Bug Category\n\nApplication Crash/Won't Start\n\n\
                   ### Severity\n\nCritical\n\n\
                   ### Error Messages\n\nQTableView::dropEvent failed; Qt runtime \
                   version differs from the DLL on PATH\n\n\
                   ### Log Files\n\n_No response_"
                .to_string(),
        }
    }

    #[test]
    fn crash_scenario_resolves_p0_and_dll_pattern() {
        let analysis = analyze_issue(&crash_record(), &default_patterns(), &default_priority_matrix());

        assert_eq!(analysis.priority, "P0");
        assert_eq!(
            analysis.pattern_detected.as_deref(),
            Some("dll_version_mismatch")
        );
        assert!(analysis.pattern_confidence >= 0.7);
        assert_eq!(
            analysis.suggested_solution.as_deref(),
            Some("DLL version mismatch - check StartAiFileSorter.exe usage and PATH")
        );
        assert_eq!(
            analysis.reference_doc.as_deref(),
            Some("QTABLEVIEW_DROPEVENT_FIX.md")
        );
        assert!(!analysis.has_logs);
        assert!(!analysis.has_copilot_error);
    }

    #[test]
    fn missing_category_defaults_to_p3_without_pattern() {
        let record = IssueRecord {
            title: "Something odd".to_string(),
            body: "### Bug Description\n\nNothing matches the catalogs here.".to_string(),
        };
        let analysis = analyze_issue(&record, &default_patterns(), &default_priority_matrix());

        assert_eq!(analysis.priority, "P3");
        assert_eq!(analysis.pattern_detected, None);
        assert_eq!(analysis.pattern_confidence, 0.0);
        assert_eq!(analysis.suggested_solution, None);
        assert_eq!(analysis.reference_doc, None);
    }

    #[test]
    fn json_omits_solution_keys_without_pattern() {
        let record = IssueRecord {
            title: "Something odd".to_string(),
            body: "### Bug Description\n\nNothing matches the catalogs here.".to_string(),
        };
        let analysis = analyze_issue(&record, &default_patterns(), &default_priority_matrix());

        let json = serde_json::to_value(&analysis).expect("serialize");
        let object = json.as_object().expect("object");
        assert!(!object.contains_key("suggested_solution"));
        assert!(!object.contains_key("reference_doc"));
        assert!(object.contains_key("pattern_detected"));

        let matched = analyze_issue(&crash_record(), &default_patterns(), &default_priority_matrix());
        let json = serde_json::to_value(&matched).expect("serialize");
        assert_eq!(
            json["reference_doc"],
            serde_json::Value::String("QTABLEVIEW_DROPEVENT_FIX.md".to_string())
        );
    }

    #[test]
    fn attachment_flags_follow_field_presence() {
        let record = IssueRecord {
            title: "Crash".to_string(),
            body: "### Log Files\n\napp.log excerpt attached\n\n\
                   ### Copilot Error File\n\nCOPILOT_ERROR_42.md contents"
                .to_string(),
        };
        let analysis = analyze_issue(&record, &default_patterns(), &default_priority_matrix());
        assert!(analysis.has_logs);
        assert!(analysis.has_copilot_error);
    }
}
