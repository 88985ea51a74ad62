//! Error types for the dxfdom library

use std::io;
use thiserror::Error;

/// Main error type for dxfdom operations
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during stream operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A group-code line that is not a valid integer.
    ///
    /// This is format corruption: the read is aborted, nothing after the
    /// bad record is recovered.
    #[error("Malformed record at line {line}: invalid group code '{text}'")]
    MalformedRecord {
        /// Line number in the input stream (1-based)
        line: usize,
        /// The offending code line
        text: String,
    },

    /// A known entity's field value failed to parse during materialization.
    ///
    /// Fields materialized before the bad one keep their values.
    #[error("Malformed value for group code {code}: '{value}'")]
    MalformedField {
        /// The group code whose value failed to parse
        code: i32,
        /// The raw value string
        value: String,
    },

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dxfdom operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_display() {
        let err = DxfError::MalformedRecord {
            line: 17,
            text: "LINE".to_string(),
        };
        assert!(err.to_string().contains("line 17"));
        assert!(err.to_string().contains("LINE"));
    }

    #[test]
    fn test_malformed_field_display() {
        let err = DxfError::MalformedField {
            code: 40,
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("40"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "stream closed");
        let dxf_err: DxfError = io_err.into();
        assert!(matches!(dxf_err, DxfError::Io(_)));
    }
}
