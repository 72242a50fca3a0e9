/*!
 * Error types for mdpack
 */

use std::fmt;
use std::io;

use thiserror::Error;

use crate::gateway::GatewayError;

pub type Result<T> = std::result::Result<T, MdpackError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_PENDING: i32 = 3;

#[derive(Error, Debug)]
pub enum MdpackError {
    /// Metadata type is not present in the registry
    #[error("Unknown metadata type: {0}")]
    UnknownMetadataType(String),

    /// Metadata type registered twice
    #[error("Metadata type already registered: {0}")]
    DuplicateMetadataType(String),

    /// Malformed flag or filter input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Remote request reached the Error state
    #[error("Request {request_id} failed:\n{}", errors.join("\n"))]
    RemoteOperation {
        request_id: String,
        errors: Vec<String>,
    },

    /// No request record matches the given id
    #[error("No request found with id {0}")]
    RequestNotFound(String),

    /// Poll budget exhausted while the request was still pending
    #[error("Request {request_id} is still pending after {attempts} follow-up checks")]
    Timeout { request_id: String, attempts: u32 },

    /// Poll session cancelled by the user
    #[error("Stopped waiting for request {request_id}")]
    Cancelled { request_id: String },

    /// Remote API transport or remote API error
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Local org configuration missing or unreadable
    #[error("Org configuration error: {0}")]
    OrgConfig(String),

    /// CLI configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MdpackError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MdpackError::UnknownMetadataType(_)
            | MdpackError::DuplicateMetadataType(_)
            | MdpackError::InvalidArgument(_)
            | MdpackError::OrgConfig(_)
            | MdpackError::Config(_) => EXIT_FATAL,
            MdpackError::Timeout { .. } | MdpackError::Cancelled { .. } => EXIT_PENDING,
            _ => EXIT_FAILURE,
        }
    }

    /// Input or setup problems that no amount of re-running will fix
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MdpackError::UnknownMetadataType(_)
                | MdpackError::DuplicateMetadataType(_)
                | MdpackError::InvalidArgument(_)
                | MdpackError::OrgConfig(_)
                | MdpackError::Config(_)
        )
    }

    /// The remote request may still finish; polling again with the same id is meaningful
    pub fn is_repollable(&self) -> bool {
        matches!(
            self,
            MdpackError::Timeout { .. } | MdpackError::Cancelled { .. }
        )
    }

    /// Get error category for logging and JSON output
    pub fn category(&self) -> ErrorCategory {
        match self {
            MdpackError::UnknownMetadataType(_) | MdpackError::DuplicateMetadataType(_) => {
                ErrorCategory::Registry
            }
            MdpackError::InvalidArgument(_) => ErrorCategory::Validation,
            MdpackError::RemoteOperation { .. } | MdpackError::RequestNotFound(_) => {
                ErrorCategory::RemoteOperation
            }
            MdpackError::Timeout { .. } | MdpackError::Cancelled { .. } => ErrorCategory::Pending,
            MdpackError::Gateway(_) => ErrorCategory::Network,
            MdpackError::OrgConfig(_) | MdpackError::Config(_) => ErrorCategory::Configuration,
            MdpackError::Io(_) => ErrorCategory::IoError,
            MdpackError::Json(_) => ErrorCategory::Codec,
        }
    }

    /// Stable error name used in JSON output
    pub fn name(&self) -> &'static str {
        match self {
            MdpackError::UnknownMetadataType(_) => "UnknownMetadataType",
            MdpackError::DuplicateMetadataType(_) => "DuplicateMetadataType",
            MdpackError::InvalidArgument(_) => "InvalidArgument",
            MdpackError::RemoteOperation { .. } => "RemoteOperationError",
            MdpackError::RequestNotFound(_) => "RequestNotFound",
            MdpackError::Timeout { .. } => "Timeout",
            MdpackError::Cancelled { .. } => "Cancelled",
            MdpackError::Gateway(_) => "GatewayError",
            MdpackError::OrgConfig(_) => "OrgConfigError",
            MdpackError::Config(_) => "ConfigError",
            MdpackError::Io(_) => "IoError",
            MdpackError::Json(_) => "JsonError",
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Metadata type registry lookups
    Registry,
    /// Flag and filter validation
    Validation,
    /// Remote request finished in error
    RemoteOperation,
    /// Remote request still pending (timeout, cancellation)
    Pending,
    /// Network/remote API errors
    Network,
    /// Configuration errors
    Configuration,
    /// I/O operation errors
    IoError,
    /// Serialization errors
    Codec,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Registry => write!(f, "registry"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::RemoteOperation => write!(f, "remote-operation"),
            ErrorCategory::Pending => write!(f, "pending"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Codec => write!(f, "codec"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(MdpackError::UnknownMetadataType("Widget".to_string()).is_fatal());
        assert!(MdpackError::InvalidArgument("bad".to_string()).is_fatal());
        assert!(MdpackError::Config("bad".to_string()).is_fatal());
    }

    #[test]
    fn test_non_fatal_errors() {
        assert!(!MdpackError::Timeout {
            request_id: "08c".to_string(),
            attempts: 3
        }
        .is_fatal());
        assert!(!MdpackError::RemoteOperation {
            request_id: "08c".to_string(),
            errors: vec![]
        }
        .is_fatal());
        assert!(!MdpackError::Io(io::Error::other("test")).is_fatal());
    }

    #[test]
    fn test_repollable_errors() {
        assert!(MdpackError::Timeout {
            request_id: "08c".to_string(),
            attempts: 0
        }
        .is_repollable());
        assert!(MdpackError::Cancelled {
            request_id: "08c".to_string()
        }
        .is_repollable());
        assert!(!MdpackError::RemoteOperation {
            request_id: "08c".to_string(),
            errors: vec!["x".to_string()]
        }
        .is_repollable());
    }

    #[test]
    fn test_remote_operation_display_lists_errors_in_order() {
        let err = MdpackError::RemoteOperation {
            request_id: "08c000000000001".to_string(),
            errors: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Request 08c000000000001 failed:\nfirst\nsecond"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            MdpackError::UnknownMetadataType("Widget".to_string()).to_string(),
            "Unknown metadata type: Widget"
        );
        assert_eq!(
            MdpackError::Timeout {
                request_id: "0Hf1".to_string(),
                attempts: 2
            }
            .to_string(),
            "Request 0Hf1 is still pending after 2 follow-up checks"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            MdpackError::UnknownMetadataType("x".to_string()).category(),
            ErrorCategory::Registry
        );
        assert_eq!(
            MdpackError::InvalidArgument("x".to_string()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            MdpackError::Cancelled {
                request_id: "x".to_string()
            }
            .category(),
            ErrorCategory::Pending
        );
        assert_eq!(
            MdpackError::Gateway(GatewayError::Transport("reset".to_string())).category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::RemoteOperation.to_string(), "remote-operation");
        assert_eq!(ErrorCategory::Pending.to_string(), "pending");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            MdpackError::InvalidArgument("x".to_string()).exit_code(),
            EXIT_FATAL
        );
        assert_eq!(
            MdpackError::Timeout {
                request_id: "x".to_string(),
                attempts: 1
            }
            .exit_code(),
            EXIT_PENDING
        );
        assert_eq!(
            MdpackError::RemoteOperation {
                request_id: "x".to_string(),
                errors: vec![]
            }
            .exit_code(),
            EXIT_FAILURE
        );
    }

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(EXIT_SUCCESS, 0);
        assert_eq!(EXIT_FAILURE, 1);
        assert_eq!(EXIT_FATAL, 2);
        assert_eq!(EXIT_PENDING, 3);
    }

    #[test]
    fn test_error_names() {
        assert_eq!(
            MdpackError::RemoteOperation {
                request_id: "x".to_string(),
                errors: vec![]
            }
            .name(),
            "RemoteOperationError"
        );
        assert_eq!(
            MdpackError::InvalidArgument("x".to_string()).name(),
            "InvalidArgument"
        );
    }
}
