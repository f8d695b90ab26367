//! # Error Types
//!
//! Structured error types for results_core.
//!
//! Missing analysis data is *not* an error here: empty point-of-interest sets,
//! empty value sets and absent end releases all resolve to zero or "not fixed".
//! Errors are reserved for a failing host provider, bad caller input, and
//! precondition failures detected before an extraction starts.
//!
//! ## Example
//!
//! ```rust
//! use results_core::errors::{ResultsError, ResultsResult};
//!
//! fn check_subdivisions(subdivisions: usize) -> ResultsResult<()> {
//!     if subdivisions < 2 {
//!         return Err(ResultsError::invalid_input(
//!             "subdivisions",
//!             subdivisions.to_string(),
//!             "Station sampling needs at least two stations",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_subdivisions(1).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for results_core operations
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Structured error type for extraction operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ResultsError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The host application rejected or failed a query
    #[error("Provider error during {operation}: {reason}")]
    Provider { operation: String, reason: String },

    /// The requested member is not present in the model
    #[error("Member not found: {member}")]
    MemberNotFound { member: String },

    /// Nothing to extract (no members, no solved loading, ...)
    #[error("Precondition failed: {reason}")]
    Precondition { reason: String },

    /// The extraction was aborted before it started
    #[error("Extraction aborted")]
    Aborted,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Snapshot schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl ResultsError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ResultsError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Provider error
    pub fn provider(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        ResultsError::Provider {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a MemberNotFound error
    pub fn member_not_found(member: impl Into<String>) -> Self {
        ResultsError::MemberNotFound {
            member: member.into(),
        }
    }

    /// Create a Precondition error
    pub fn precondition(reason: impl Into<String>) -> Self {
        ResultsError::Precondition {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ResultsError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller may reasonably try again.
    ///
    /// The engine itself never retries; this only informs the command layer.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ResultsError::Provider { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ResultsError::InvalidInput { .. } => "INVALID_INPUT",
            ResultsError::Provider { .. } => "PROVIDER_ERROR",
            ResultsError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            ResultsError::Precondition { .. } => "PRECONDITION_FAILED",
            ResultsError::Aborted => "ABORTED",
            ResultsError::FileError { .. } => "FILE_ERROR",
            ResultsError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ResultsError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for ResultsError {
    fn from(err: serde_json::Error) -> Self {
        ResultsError::SerializationError {
            reason: err.to_string(),
        }
    }
}
