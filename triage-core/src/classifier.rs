//! Pattern classification and priority resolution.

use crate::catalog::{PatternCatalogEntry, PriorityMatrix};
use crate::domain::ClassificationResult;

/// Match a text blob against the pattern catalog.
///
/// For each entry, confidence is the fraction of its keywords that occur
/// case-insensitively as substrings of the text. An entry is a candidate
/// only when its confidence meets its own threshold. Candidates are scanned
/// in catalog order and replace the current best only on strictly greater
/// confidence, so earlier entries win ties. If nothing qualifies the result
/// carries no pattern and confidence 0.0.
pub fn classify(catalog: &[PatternCatalogEntry], text: &str) -> ClassificationResult {
    let text_lower = text.to_lowercase();
    let mut best = ClassificationResult::none();

    for entry in catalog {
        let matches = entry
            .keywords
            .iter()
            .filter(|keyword| text_lower.contains(&keyword.to_lowercase()))
            .count();
        let confidence = matches as f64 / entry.keywords.len() as f64;

        if confidence > best.confidence && confidence >= entry.confidence_threshold {
            best.confidence = confidence;
            best.best_pattern = Some(entry.name.to_string());
        }
    }

    best
}

/// Resolve a (category, severity) pair to a priority label.
///
/// Total over all inputs: an unknown category yields `P3` unconditionally,
/// and a known category with an unknown severity falls back to `P3`.
pub fn resolve_priority(matrix: &PriorityMatrix, category: &str, severity: &str) -> String {
    matrix
        .get(category)
        .and_then(|by_severity| by_severity.get(severity))
        .cloned()
        .unwrap_or_else(|| "P3".to_string())
}

#[cfg(test)]
mod tests {
    use super::{classify, resolve_priority};
    use crate::catalog::{PatternCatalogEntry, default_patterns, default_priority_matrix};

    fn entry(
        name: &'static str,
        keywords: &'static [&'static str],
        threshold: f64,
    ) -> PatternCatalogEntry {
        PatternCatalogEntry {
            name,
            keywords,
            confidence_threshold: threshold,
            solution: "solution",
            reference: "reference.md",
        }
    }

    #[test]
    fn confidence_is_exact_keyword_fraction() {
        let catalog = vec![entry("half", &["alpha", "beta", "gamma", "delta"], 0.4)];
        let result = classify(&catalog, "alpha and BETA are present");
        assert_eq!(result.best_pattern.as_deref(), Some("half"));
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn below_threshold_yields_no_pattern() {
        let catalog = vec![entry("strict", &["alpha", "beta"], 0.9)];
        let result = classify(&catalog, "only alpha here");
        assert_eq!(result.best_pattern, None);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn earlier_entry_wins_confidence_tie() {
        let catalog = vec![
            entry("first", &["alpha", "beta"], 0.5),
            entry("second", &["alpha", "gamma"], 0.5),
        ];
        let result = classify(&catalog, "alpha appears once");
        assert_eq!(result.best_pattern.as_deref(), Some("first"));
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn later_entry_wins_on_strictly_greater_confidence() {
        let catalog = vec![
            entry("first", &["alpha", "beta"], 0.5),
            entry("second", &["alpha", "gamma"], 0.5),
        ];
        let result = classify(&catalog, "alpha and gamma appear");
        assert_eq!(result.best_pattern.as_deref(), Some("second"));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn single_keyword_full_threshold_requires_exact_substring() {
        let catalog = vec![entry("exact", &["quota exceeded"], 1.0)];
        assert_eq!(
            classify(&catalog, "the QUOTA EXCEEDED limit was hit")
                .best_pattern
                .as_deref(),
            Some("exact")
        );
        assert_eq!(classify(&catalog, "quota nearly reached").best_pattern, None);
        assert_eq!(classify(&catalog, "unrelated text").confidence, 0.0);
    }

    #[test]
    fn dll_mismatch_scenario_meets_threshold() {
        let text = "App crashes on launch. QTableView::dropEvent failed; \
                    Qt runtime version differs from the DLL on PATH";
        let result = classify(&default_patterns(), text);
        assert_eq!(result.best_pattern.as_deref(), Some("dll_version_mismatch"));
        assert!(result.confidence >= 0.7);
    }

    #[test]
    fn priority_lookup_uses_matrix() {
        let matrix = default_priority_matrix();
        assert_eq!(
            resolve_priority(&matrix, "Application Crash/Won't Start", "Critical"),
            "P0"
        );
        assert_eq!(resolve_priority(&matrix, "Qt/UI Issue", "Medium"), "P2");
    }

    #[test]
    fn priority_is_total_over_unknown_inputs() {
        let matrix = default_priority_matrix();
        assert_eq!(resolve_priority(&matrix, "Unheard Of Category", "Critical"), "P3");
        assert_eq!(resolve_priority(&matrix, "Qt/UI Issue", "Catastrophic"), "P3");
        assert_eq!(resolve_priority(&matrix, "", ""), "P3");
    }
}
