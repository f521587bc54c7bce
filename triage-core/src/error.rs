//! Error types for triage core.

use std::{error::Error, fmt, io};

/// Error type for triage core operations.
#[derive(Debug)]
pub enum TriageError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A JSON serialization or deserialization error.
    Json(serde_json::Error),
    /// An invalid detection-rule or extraction pattern.
    Pattern(regex::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Pattern(err) => write!(f, "pattern error: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for TriageError {}

impl From<io::Error> for TriageError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<regex::Error> for TriageError {
    fn from(value: regex::Error) -> Self {
        Self::Pattern(value)
    }
}

/// Convenience result type for triage core.
pub type Result<T> = std::result::Result<T, TriageError>;
