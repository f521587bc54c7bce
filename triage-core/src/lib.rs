#![deny(missing_docs)]
//! Triage core library.
//!
//! This crate contains the classification, triage, and defect-signature
//! scanning primitives behind the `triage` command-line tool: heuristic
//! matching of bug reports against a pattern catalog, priority resolution,
//! and textual signature scanning of known-defect source files.

pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fs;
pub mod incident;
pub mod report;
pub mod scanner;
pub mod signature;
/// The built-in defect signature catalog.
pub mod signatures;
pub mod triage;

pub use catalog::{PatternCatalogEntry, PriorityMatrix, default_patterns, default_priority_matrix};
pub use classifier::{classify, resolve_priority};
pub use domain::{
    ClassificationResult, ExtractedFields, Finding, IssueRecord, Severity, SeverityCounts,
};
pub use error::{Result, TriageError};
pub use extract::{extract_field, extract_fields};
pub use fs::{FileSystem, StdFileSystem};
pub use incident::{IncidentRecord, parse_incident_record};
pub use report::{
    DiagnosticReport, render_json, render_scan_summary, render_triage_markdown,
};
pub use scanner::{DiagnosticScanner, REPORT_FILE_NAME, write_report};
pub use signature::{SignatureCheck, SignatureMatch};
pub use signatures::build_signature_checks;
pub use triage::{TriageAnalysis, analyze_issue};
