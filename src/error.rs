//! Error types for loading and querying analyses
//!
//! The analysis core itself never fails; these errors only arise at the
//! boundary (reading a source unit, resolving CLI selections).

use crate::cfg::analysis::CfgError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PathcastError>;

/// Pathcast errors
#[derive(Error, Debug)]
pub enum PathcastError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed source unit: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Function '{0}' not found")]
    FunctionNotFound(String),

    #[error("Duplicate parameter '{param}' in function '{function}'")]
    DuplicateParam { function: String, param: String },

    #[error("Test case {index} out of range for '{function}' ({count} cases)")]
    CaseOutOfRange {
        function: String,
        index: usize,
        count: usize,
    },

    #[error("Invalid assignment '{0}': expected name=integer")]
    InvalidAssignment(String),

    #[error(transparent)]
    Cfg(#[from] CfgError),
}
