//! Signature check trait definitions.

use std::path::Path;

use crate::domain::Severity;
use crate::error::Result;

/// Maximum length of an evidence snippet attached to a finding.
pub const SNIPPET_CAP: usize = 200;

/// One candidate line produced by a detection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatch {
    /// 1-based line number of the match.
    pub line_number: usize,
    /// Evidence snippet, already truncated to [`SNIPPET_CAP`].
    pub snippet: String,
}

impl SignatureMatch {
    /// Build a match, truncating the snippet to the evidence cap.
    pub fn new(line_number: usize, snippet: &str) -> Self {
        Self {
            line_number,
            snippet: truncate_snippet(snippet),
        }
    }
}

/// A named heuristic predicate over one target file's content.
///
/// Checks carry their static metadata (severity, description, remediation)
/// and evaluate purely over in-memory content, so each rule can be tested
/// against crafted fixtures without filesystem access.
pub trait SignatureCheck {
    /// Stable identifier of the defect (e.g. "BUG-001").
    fn id(&self) -> &str;
    /// Severity assigned to findings from this check.
    fn severity(&self) -> Severity;
    /// Target file path, relative to the scanned repository root.
    fn target(&self) -> &Path;
    /// Description attached to findings from this check.
    fn description(&self) -> &str;
    /// Remediation attached to findings from this check.
    fn recommendation(&self) -> &str;
    /// Upper bound on reported findings, `None` for unbounded.
    ///
    /// Bounded reporting is deliberate for list-style rules that would
    /// otherwise flood the report with near-identical lines.
    fn max_findings(&self) -> Option<usize> {
        None
    }
    /// Evaluate the detection rule against the file content.
    fn evaluate(&self, content: &str) -> Result<Vec<SignatureMatch>>;
}

/// Truncate a snippet to the evidence cap, marking the cut with an ellipsis.
pub fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() > SNIPPET_CAP {
        let truncated: String = snippet.chars().take(SNIPPET_CAP).collect();
        format!("{truncated}...")
    } else {
        snippet.to_string()
    }
}

/// 1-based line number of the line containing the given byte offset.
pub fn line_number_at(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::{SNIPPET_CAP, SignatureMatch, line_number_at, truncate_snippet};

    #[test]
    fn short_snippet_is_untouched() {
        assert_eq!(truncate_snippet("short"), "short");
    }

    #[test]
    fn long_snippet_is_capped_with_ellipsis() {
        let long = "x".repeat(SNIPPET_CAP + 50);
        let snippet = truncate_snippet(&long);
        assert_eq!(snippet.chars().count(), SNIPPET_CAP + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn match_constructor_truncates() {
        let long = "y".repeat(SNIPPET_CAP * 2);
        let m = SignatureMatch::new(7, &long);
        assert_eq!(m.line_number, 7);
        assert!(m.snippet.len() <= SNIPPET_CAP + 3);
    }

    #[test]
    fn line_numbers_are_one_based() {
        let content = "first\nsecond\nthird";
        assert_eq!(line_number_at(content, 0), 1);
        let offset = content.find("third").expect("offset");
        assert_eq!(line_number_at(content, offset), 3);
    }
}
