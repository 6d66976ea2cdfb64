//! Error types for mousetrail.
//!
//! This module defines all error types used throughout the mousetrail crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::monitor::MonitorError;

/// The main error type for mousetrail operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Session Errors ===
    /// A session file could not be read.
    #[error("failed to read session file {path}: {source}")]
    SessionRead {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A session file did not contain the expected JSON.
    #[error("malformed session file {path}: {source}")]
    SessionParse {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// No session matches the given id or path.
    #[error("session not found: {reference}")]
    SessionNotFound {
        /// The id or path that was looked up.
        reference: String,
    },

    /// A session with this id is already stored.
    #[error("session already exists: {id}")]
    SessionExists {
        /// The id that is taken.
        id: String,
    },

    /// An operation needs data the session does not have.
    #[error("no {what} data available")]
    NoData {
        /// The kind of data that was missing.
        what: &'static str,
    },

    // === Capture Errors ===
    /// Input capture is not available in this build or session.
    #[error("input capture unavailable: {0}")]
    InputUnavailable(String),

    /// The input monitor failed.
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    // === Platform Errors ===
    /// Required platform permission is missing.
    #[error("missing permission: {permission}. {instructions}")]
    PermissionMissing {
        /// Name of the required permission.
        permission: String,
        /// Instructions for granting the permission.
        instructions: String,
    },

    /// Platform-specific operation failed.
    #[error("platform error: {0}")]
    Platform(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Rendering Errors ===
    /// Image encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for mousetrail operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new platform error.
    #[must_use]
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an input-unavailable error.
    #[must_use]
    pub fn input_unavailable(message: impl Into<String>) -> Self {
        Self::InputUnavailable(message.into())
    }

    /// Create a permission missing error with instructions.
    #[must_use]
    pub fn permission_missing(
        permission: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self::PermissionMissing {
            permission: permission.into(),
            instructions: instructions.into(),
        }
    }

    /// Create a session-not-found error.
    #[must_use]
    pub fn session_not_found(reference: impl Into<String>) -> Self {
        Self::SessionNotFound {
            reference: reference.into(),
        }
    }

    /// Check if this error is a permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionMissing { .. })
    }

    /// Check if this error means the session had nothing to work with.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoData { what: "movement" };
        assert_eq!(err.to_string(), "no movement data available");

        let err = Error::platform("test error");
        assert_eq!(err.to_string(), "platform error: test error");
    }

    #[test]
    fn test_error_is_permission_error() {
        let err = Error::permission_missing("Accessibility", "Open System Settings");
        assert!(err.is_permission_error());
        assert!(!Error::input_unavailable("no display").is_permission_error());
    }

    #[test]
    fn test_error_is_no_data() {
        assert!(Error::NoData { what: "click" }.is_no_data());
        assert!(!Error::platform("test").is_no_data());
    }

    #[test]
    fn test_permission_error_display() {
        let err = Error::permission_missing(
            "Input Monitoring",
            "Grant access in Privacy & Security > Input Monitoring",
        );
        let msg = err.to_string();
        assert!(msg.contains("Input Monitoring"));
        assert!(msg.contains("Privacy & Security"));
    }

    #[test]
    fn test_input_unavailable_display() {
        let err = Error::input_unavailable("built without the input-hook feature");
        assert!(err.to_string().contains("input-hook"));
    }

    #[test]
    fn test_session_not_found_display() {
        let err = Error::session_not_found("20240101_120000");
        assert_eq!(err.to_string(), "session not found: 20240101_120000");
    }

    #[test]
    fn test_session_exists_display() {
        let err = Error::SessionExists {
            id: "20240101_120000".to_string(),
        };
        assert_eq!(err.to_string(), "session already exists: 20240101_120000");
    }

    #[test]
    fn test_from_monitor_error() {
        let err: Error = MonitorError::AlreadyRunning.into();
        assert!(matches!(err, Error::Monitor(_)));
        assert_eq!(err.to_string(), "monitor already running");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_session_read_error_display() {
        let err = Error::SessionRead {
            path: PathBuf::from("/tmp/movements_x.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/movements_x.json"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "grid_size must be at least 2".to_string(),
        };
        assert!(err.to_string().contains("grid_size"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
