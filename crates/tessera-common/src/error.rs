//! Error types for Tessera.

use thiserror::Error;

/// Result type alias using TesseraError.
pub type Result<T> = std::result::Result<T, TesseraError>;

/// Errors that can occur in Tessera operations.
#[derive(Debug, Error)]
pub enum TesseraError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Index errors
    #[error("Invalid branching factor: {0} (must be greater than 2)")]
    InvalidBranchingFactor(usize),

    // Schema errors
    #[error("Row size does not match table size: expected {expected}, got {actual}")]
    RowArityMismatch { expected: usize, actual: usize },

    #[error("Type mismatch in column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Table has no columns")]
    EmptyTable,

    // Value errors
    #[error("Unknown data type: {0}")]
    UnknownDataType(String),

    #[error("Cannot parse '{raw}' as {dtype}")]
    ValueParse { dtype: String, raw: String },

    // Import/export errors
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_conversion() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: TesseraError = io_err.into();
        assert!(matches!(err, TesseraError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_branching_factor_display() {
        let err = TesseraError::InvalidBranchingFactor(2);
        assert_eq!(
            err.to_string(),
            "Invalid branching factor: 2 (must be greater than 2)"
        );
    }

    #[test]
    fn test_row_arity_mismatch_display() {
        let err = TesseraError::RowArityMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Row size does not match table size: expected 3, got 2"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = TesseraError::TypeMismatch {
            column: "age".to_string(),
            expected: "INT".to_string(),
            actual: "TEXT".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch in column 'age': expected INT, got TEXT"
        );
    }

    #[test]
    fn test_value_parse_display() {
        let err = TesseraError::ValueParse {
            dtype: "INT".to_string(),
            raw: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot parse 'abc' as INT");
    }

    #[test]
    fn test_invalid_format_display() {
        let err = TesseraError::InvalidFormat("file must contain at least 2 lines".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid file format: file must contain at least 2 lines"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(TesseraError::EmptyTable)
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TesseraError>();
    }
}
