//! Error types for atelier
//!
//! Provides a unified error type used across all atelier crates.

use std::path::PathBuf;

/// Main error type for atelier operations
#[derive(Debug, thiserror::Error)]
pub enum AtelierError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Connection Errors ===

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Connection timeout after {seconds}s")]
    ConnectionTimeout { seconds: u64 },

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    #[error("Not connected")]
    NotConnected,

    // === Protocol Errors ===

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    // === API Errors ===

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: credentials rejected")]
    Unauthorized,

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtelierError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an invalid-message error
    pub fn invalid_message(msg: impl Into<String>) -> Self {
        Self::InvalidMessage(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map an HTTP status to an API error. 401 becomes [`Self::Unauthorized`]
    /// so callers can invalidate stored credentials.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::Api {
                status,
                message: message.into(),
            }
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::Connection(_)
        )
    }

    /// Check if this error invalidates stored credentials
    pub fn invalidates_credentials(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Result type alias using AtelierError
pub type Result<T> = std::result::Result<T, AtelierError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Display Tests ====================

    #[test]
    fn test_error_display_connection() {
        let err = AtelierError::Connection("refused".into());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_error_display_connection_timeout() {
        let err = AtelierError::ConnectionTimeout { seconds: 5 };
        assert_eq!(err.to_string(), "Connection timeout after 5s");
    }

    #[test]
    fn test_error_display_connection_closed() {
        let err = AtelierError::ConnectionClosed;
        assert_eq!(err.to_string(), "Connection closed unexpectedly");
    }

    #[test]
    fn test_error_display_not_connected() {
        let err = AtelierError::NotConnected;
        assert_eq!(err.to_string(), "Not connected");
    }

    #[test]
    fn test_error_display_invalid_message() {
        let err = AtelierError::InvalidMessage("malformed JSON".into());
        assert_eq!(err.to_string(), "Invalid message: malformed JSON");
    }

    #[test]
    fn test_error_display_api() {
        let err = AtelierError::Api {
            status: 404,
            message: "Chat not found".into(),
        };
        assert_eq!(err.to_string(), "API error (404): Chat not found");
    }

    #[test]
    fn test_error_display_unauthorized() {
        let err = AtelierError::Unauthorized;
        assert_eq!(err.to_string(), "Unauthorized: credentials rejected");
    }

    #[test]
    fn test_error_display_config() {
        let err = AtelierError::Config("missing api_base".into());
        assert_eq!(err.to_string(), "Configuration error: missing api_base");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err = AtelierError::FileRead {
            path: PathBuf::from("/missing/token"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/missing/token"));
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_api_helper_maps_401_to_unauthorized() {
        let err = AtelierError::api(401, "Unauthorized");
        assert!(matches!(err, AtelierError::Unauthorized));
        assert!(err.invalidates_credentials());
    }

    #[test]
    fn test_api_helper_other_statuses() {
        let err = AtelierError::api(500, "Internal Server Error");
        if let AtelierError::Api { status, message } = err {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        } else {
            panic!("Expected Api variant");
        }
    }

    #[test]
    fn test_connection_helper() {
        let err = AtelierError::connection("host unreachable");
        assert!(matches!(err, AtelierError::Connection(_)));
    }

    #[test]
    fn test_config_helper() {
        let err = AtelierError::config("bad url");
        assert!(matches!(err, AtelierError::Config(_)));
    }

    // ==================== Classifier Tests ====================

    #[test]
    fn test_retryable() {
        assert!(AtelierError::ConnectionTimeout { seconds: 5 }.is_retryable());
        assert!(AtelierError::Connection("refused".into()).is_retryable());
        assert!(!AtelierError::NotConnected.is_retryable());
        assert!(!AtelierError::Unauthorized.is_retryable());
        assert!(!AtelierError::ConnectionClosed.is_retryable());
    }

    #[test]
    fn test_only_unauthorized_invalidates_credentials() {
        let errors = [
            AtelierError::Connection("x".into()),
            AtelierError::ConnectionClosed,
            AtelierError::NotConnected,
            AtelierError::Api {
                status: 403,
                message: "Forbidden".into(),
            },
            AtelierError::Config("x".into()),
        ];
        for err in errors {
            assert!(!err.invalidates_credentials(), "{:?}", err);
        }
    }

    // ==================== From Trait Tests ====================

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: AtelierError = io_err.into();
        assert!(matches!(err, AtelierError::Io(_)));
    }
}
