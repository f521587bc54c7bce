//! Static catalogs driving classification and priority resolution.
//!
//! Both catalogs are plain immutable data passed into the engine at call
//! sites, so alternate rule sets can be swapped in for tests or future
//! configuration without touching the matching logic.

use std::collections::BTreeMap;

use serde::Serialize;

/// One named bug pattern: a keyword set, an acceptance threshold, and the
/// triage guidance attached to a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternCatalogEntry {
    /// Stable pattern name (e.g. "dll_version_mismatch").
    pub name: &'static str,
    /// Keywords matched case-insensitively as substrings.
    pub keywords: &'static [&'static str],
    /// Minimum keyword-match fraction for this entry to be a candidate.
    pub confidence_threshold: f64,
    /// Suggested solution for a confirmed match.
    pub solution: &'static str,
    /// Reference document describing the pattern.
    pub reference: &'static str,
}

/// Lookup table mapping a bug category to severity-keyed priority labels.
pub type PriorityMatrix = BTreeMap<String, BTreeMap<String, String>>;

/// Known bug patterns, in catalog order.
///
/// Order is part of the contract: the classifier scans entries in this
/// order and earlier entries win confidence ties.
pub fn default_patterns() -> Vec<PatternCatalogEntry> {
    vec![
        PatternCatalogEntry {
            name: "dll_version_mismatch",
            keywords: &["QTableView::dropEvent", "Qt runtime", "Qt compile", "DLL"],
            confidence_threshold: 0.7,
            solution: "DLL version mismatch - check StartAiFileSorter.exe usage and PATH",
            reference: "QTABLEVIEW_DROPEVENT_FIX.md",
        },
        PatternCatalogEntry {
            name: "ggml_function_missing",
            keywords: &["ggml_xielu", "llama.dll", "entry point", "procedure"],
            confidence_threshold: 0.7,
            solution: "GGML library outdated - rebuild llama.cpp then application",
            reference: "README.md - Troubleshooting",
        },
        PatternCatalogEntry {
            name: "permission_denied",
            keywords: &["permission denied", "access denied", "cannot write", "read-only"],
            confidence_threshold: 0.6,
            solution: "File permission issue - check permissions, antivirus, run as admin",
            reference: "BUGFIXING_GUIDE.md - Filesystem",
        },
        PatternCatalogEntry {
            name: "api_rate_limit",
            keywords: &["rate limit", "quota exceeded", "too many requests", "Gemini", "OpenAI"],
            confidence_threshold: 0.7,
            solution: "API rate limiting - verify rate limiter is enabled, reduce batch size",
            reference: "README.md - Gemini API",
        },
        PatternCatalogEntry {
            name: "local_llm_load_fail",
            keywords: &["model not found", "out of memory", "GGUF", "quantization"],
            confidence_threshold: 0.6,
            solution: "LLM loading issue - verify model file, check RAM/VRAM, try smaller quantization",
            reference: "README.md - Local LLM",
        },
    ]
}

/// Priority matrix from the issue triage guide.
pub fn default_priority_matrix() -> PriorityMatrix {
    let rows: &[(&str, [(&str, &str); 4])] = &[
        (
            "Application Crash/Won't Start",
            [("Critical", "P0"), ("High", "P0"), ("Medium", "P1"), ("Low", "P2")],
        ),
        (
            "DLL/Library Loading Error",
            [("Critical", "P0"), ("High", "P1"), ("Medium", "P1"), ("Low", "P2")],
        ),
        (
            "Qt/UI Issue",
            [("Critical", "P1"), ("High", "P1"), ("Medium", "P2"), ("Low", "P3")],
        ),
        (
            "Categorization/AI Model Issue",
            [("Critical", "P1"), ("High", "P2"), ("Medium", "P2"), ("Low", "P3")],
        ),
        (
            "File Sorting/Moving Error",
            [("Critical", "P0"), ("High", "P1"), ("Medium", "P2"), ("Low", "P3")],
        ),
        (
            "Database/Cache Issue",
            [("Critical", "P1"), ("High", "P2"), ("Medium", "P2"), ("Low", "P3")],
        ),
        (
            "API Integration (OpenAI/Gemini)",
            [("Critical", "P1"), ("High", "P2"), ("Medium", "P2"), ("Low", "P3")],
        ),
        (
            "Performance/Slow Operation",
            [("Critical", "P2"), ("High", "P2"), ("Medium", "P3"), ("Low", "P3")],
        ),
    ];

    rows.iter()
        .map(|(category, cells)| {
            let by_severity = cells
                .iter()
                .map(|(severity, priority)| (severity.to_string(), priority.to_string()))
                .collect();
            (category.to_string(), by_severity)
        })
        .collect()
}
