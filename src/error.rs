//! Error types for projboard.
//!
//! This module defines all error types shared by the registry, the
//! dashboard sources, the REST client and the server.

use thiserror::Error;

use crate::core::project::ProjectId;

/// Result type alias for projboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for projboard
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Project Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Project not found in the registry
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// A required field was missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    // ═══════════════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Transport Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Request could not be sent or the response could not be read
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message reported by the server
        message: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Dashboard Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Dashboard data source unavailable
    #[error("Dashboard source unavailable: {0}")]
    Source(String),

    // ═══════════════════════════════════════════════════════════════════
    // Serialization Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if retrying on the next refresh may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Source(_))
            || matches!(self, Error::Status { status, .. } if *status >= 500)
    }

    /// Returns true if the caller sent something the server rejected
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::ProjectNotFound(_) | Error::MissingField(_) | Error::InvalidParameter { .. }
        ) || matches!(self, Error::Status { status, .. } if (400..500).contains(status))
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Project errors: 1xxx
            Error::ProjectNotFound(_) => 1001,
            Error::MissingField(_) => 1002,

            // Validation errors: 2xxx
            Error::InvalidParameter { .. } => 2001,

            // Transport errors: 3xxx
            Error::Http(_) => 3001,
            Error::Status { .. } => 3002,

            // Dashboard errors: 4xxx
            Error::Source(_) => 4001,

            // Serialization errors: 7xxx
            Error::Serialization(_) => 7001,
            Error::Deserialization(_) => 7002,

            // Internal errors: 9xxx
            Error::Io(_) => 9001,
            Error::Internal(_) => 9002,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::Deserialization(err.to_string())
        } else {
            Error::Serialization(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_unique() {
        let codes = vec![
            Error::ProjectNotFound(ProjectId::new(1)).code(),
            Error::MissingField("name").code(),
            Error::InvalidParameter { name: "".into(), reason: "".into() }.code(),
            Error::Http("".into()).code(),
            Error::Status { status: 500, message: "".into() }.code(),
            Error::Source("".into()).code(),
            Error::Serialization("".into()).code(),
            Error::Deserialization("".into()).code(),
            Error::Io("".into()).code(),
            Error::Internal("".into()).code(),
        ];

        let mut unique_codes = codes.clone();
        unique_codes.sort();
        unique_codes.dedup();

        assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");
    }

    #[test]
    fn test_error_display() {
        let err = Error::Status { status: 404, message: "gone".into() };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("gone"));

        assert_eq!(
            Error::ProjectNotFound(ProjectId::new(7)).to_string(),
            "Project not found: 7"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::Http("connection refused".into()).is_recoverable());
        assert!(Error::Status { status: 503, message: "".into() }.is_recoverable());
        assert!(!Error::Status { status: 404, message: "".into() }.is_recoverable());
        assert!(!Error::MissingField("name").is_recoverable());
    }

    #[test]
    fn test_is_client_error() {
        assert!(Error::MissingField("repository").is_client_error());
        assert!(Error::Status { status: 400, message: "".into() }.is_client_error());
        assert!(!Error::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<u64>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Deserialization(_)));
    }
}
