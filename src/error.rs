//! Custom error types for the EDA helper library.
//!
//! Provides a small error hierarchy using `thiserror`. Every operation in
//! this crate either succeeds or fails immediately with one of these
//! variants; nothing is retried or swallowed internally.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for all dataset operations.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A value could not be coerced to the requested type.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversion {
        column: String,
        target_type: String,
        reason: String,
    },

    /// Caller supplied an unrecognized fill/outlier/aggregation policy.
    #[error("Unknown policy '{0}'")]
    UnknownPolicy(String),

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Malformed rows or header in a delimited file.
    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    /// Chart rendering failed in the plotting backend.
    #[error("Plot rendering failed: {0}")]
    Plot(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl EdaError {
    /// Get a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::TypeConversion { .. } => "TYPE_CONVERSION_FAILED",
            Self::UnknownPolicy(_) => "UNKNOWN_POLICY",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Plot(_) => "PLOT_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

/// Serialize implementation so errors can be shipped to callers as
/// `{ code, message }` objects.
impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, EdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::ColumnNotFound("age".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            EdaError::UnknownPolicy("zigzag".to_string()).error_code(),
            "UNKNOWN_POLICY"
        );
    }

    #[test]
    fn test_error_display() {
        let err = EdaError::TypeConversion {
            column: "start".to_string(),
            target_type: "datetime".to_string(),
            reason: "unparseable value 'soon'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start"));
        assert!(msg.contains("datetime"));
        assert!(msg.contains("soon"));
    }

    #[test]
    fn test_error_serialization() {
        let err = EdaError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }
}
