//! Error types for the data-loader crate.
//!
//! Every row-level problem is reported with the 1-based line number it came
//! from, so a loader can skip the row and tell the caller exactly which one
//! was rejected.

use thiserror::Error;

/// Errors that can occur while loading or writing user records
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A row in the CSV source couldn't be turned into a `UserRecord`
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },
}

impl DataLoadError {
    /// Line number this error refers to, if it is a row-level error
    pub fn line(&self) -> Option<usize> {
        match self {
            DataLoadError::ParseError { line, .. } => Some(*line),
            DataLoadError::FieldCountMismatch { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
