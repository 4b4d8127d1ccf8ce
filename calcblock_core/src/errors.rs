//! # Error Types
//!
//! Structured error types for calcblock_core. A calculation either succeeds
//! completely or is rejected with enough context for the caller to ask for
//! corrected input. There are no partial results.
//!
//! ## Example
//!
//! ```rust
//! use calcblock_core::errors::{CalcError, CalcResult};
//!
//! fn validate_area(area_m2: f64) -> CalcResult<()> {
//!     if area_m2 < 0.0 {
//!         return Err(CalcError::invalid_configuration(
//!             "wall.area_m2",
//!             area_m2.to_string(),
//!             "Wall area cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calcblock_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Input geometry, ratio, or price is outside its valid domain
    /// (zero denominators, non-positive dimensions, negative area, ...)
    #[error("Invalid configuration for '{field}': {value} - {reason}")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    /// The summary document could not be produced
    #[error("Report failed at {stage}: {reason}")]
    ReportFailed { stage: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidConfiguration {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ReportFailed error
    pub fn report_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ReportFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            CalcError::ReportFailed { .. } => "REPORT_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_configuration("joint.width_cm", "-1", "Joint width cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidConfiguration\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::invalid_configuration("x", "0", "bad").error_code(),
            "INVALID_CONFIGURATION"
        );
        assert_eq!(CalcError::report_failed("compile", "boom").error_code(), "REPORT_FAILED");
        assert_eq!(CalcError::file_error("write", "a.pdf", "denied").error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_display_message() {
        let err = CalcError::invalid_configuration("binder.cement_parts", "0", "Ratio parts must sum to a positive number");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'binder.cement_parts': 0 - Ratio parts must sum to a positive number"
        );
    }
}
