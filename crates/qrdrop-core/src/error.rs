//! Error types module
//!
//! All failures of the upload hand-off are unified under [`AppError`]. Each variant
//! describes its own HTTP presentation through [`ErrorMetadata`], so the API layer
//! only has to render what the error says about itself.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like an expired token
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_TOKEN")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No session cookie, or one that does not verify.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Token never issued, already consumed, or past its expiry.
    #[error("Invalid or expired QR code: {0}")]
    InvalidToken(String),

    /// Missing file field, unreadable multipart body, or body over the size cap.
    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    /// Blob store returned a non-success status or could not be reached.
    #[error("Upstream store failure: {0}")]
    UpstreamStoreFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Sign in and retry with a valid session cookie"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidToken(_) => (
            400,
            "INVALID_TOKEN",
            false,
            Some("Generate a new QR code and scan it again"),
            false,
            LogLevel::Debug,
        ),
        AppError::MalformedUpload(_) => (
            400,
            "MALFORMED_UPLOAD",
            false,
            Some("Send a single multipart field named 'file' of at most 10 MiB"),
            false,
            LogLevel::Debug,
        ),
        AppError::UpstreamStoreFailure(_) => (
            500,
            "UPSTREAM_STORE_FAILURE",
            true,
            Some("Submit the same upload again before the QR code expires"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::InvalidToken(_) => "InvalidToken",
            AppError::MalformedUpload(_) => "MalformedUpload",
            AppError::UpstreamStoreFailure(_) => "UpstreamStoreFailure",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::InvalidToken(_) => "Invalid or expired QR code".to_string(),
            AppError::MalformedUpload(ref msg) => msg.clone(),
            AppError::UpstreamStoreFailure(_) => "Error uploading to storage".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_invalid_token() {
        let err = AppError::InvalidToken("xyz".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TOKEN");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Invalid or expired QR code");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_upstream_failure_is_recoverable() {
        let err = AppError::UpstreamStoreFailure("503 from upstream".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "UPSTREAM_STORE_FAILURE");
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("503"));
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_status_codes() {
        assert_eq!(
            AppError::Unauthorized("no cookie".to_string()).http_status_code(),
            401
        );
        assert_eq!(
            AppError::MalformedUpload("no file".to_string()).http_status_code(),
            400
        );
        assert_eq!(AppError::Internal("boom".to_string()).http_status_code(), 500);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("while storing"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("Caused by"));
    }
}
