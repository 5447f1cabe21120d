//! Error types module
//!
//! All gateway failures are unified under [`AppError`]. Each variant describes how
//! it is presented to clients through [`ErrorMetadata`]; the HTTP crate only turns
//! that metadata into a response.
//!
//! The `Database` variant wraps `sqlx::Error` when the `sqlx` feature is enabled and
//! falls back to a plain message otherwise.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for abuse signals like rate limiting or spoofed content
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "VALIDATION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Itemised problems the client can fix, if any
    fn client_details(&self) -> Option<Vec<String>>;

    /// Seconds the client should wait before retrying, if the error is a throttle
    fn retry_after_secs(&self) -> Option<u64>;

    /// Whether internal details must stay server-side
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Content integrity violation: {0}")]
    ContentIntegrity(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Persistence failure: {message}: {source}")]
    Persistence {
        message: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wrap a store failure so the client only sees `message`.
    pub fn persistence(message: impl Into<String>, source: AppError) -> Self {
        AppError::Persistence {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Variant name, used as a structured log field.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Validation(_) => "Validation",
            AppError::InvalidPayload(_) => "InvalidPayload",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::ContentIntegrity(_) => "ContentIntegrity",
            AppError::MethodNotAllowed => "MethodNotAllowed",
            AppError::RateLimited { .. } => "RateLimited",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Persistence { .. } => "Persistence",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidPayload(err.to_string())
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::Validation(_) => (400, "VALIDATION_FAILED", false, LogLevel::Debug),
        AppError::InvalidPayload(_) => (400, "INVALID_PAYLOAD", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::ContentIntegrity(_) => (400, "CONTENT_INTEGRITY", false, LogLevel::Warn),
        AppError::MethodNotAllowed => (405, "METHOD_NOT_ALLOWED", false, LogLevel::Debug),
        AppError::RateLimited { .. } => (429, "RATE_LIMITED", false, LogLevel::Warn),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Forbidden(_) => (403, "FORBIDDEN", false, LogLevel::Warn),
        AppError::Persistence { .. } => (500, "PERSISTENCE_ERROR", true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::InvalidPayload(_) => "Invalid request body".to_string(),
            AppError::InvalidInput(msg)
            | AppError::ContentIntegrity(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::RateLimited { .. } => "Too many requests. Please try again later.".to_string(),
            AppError::Persistence { message, .. } => message.clone(),
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }

    fn client_details(&self) -> Option<Vec<String>> {
        match self {
            AppError::Validation(details) => Some(details.clone()),
            AppError::InvalidPayload(reason) => Some(vec![reason.clone()]),
            _ => None,
        }
    }

    fn retry_after_secs(&self) -> Option<u64> {
        match self {
            AppError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_exposes_every_detail() {
        let err = AppError::Validation(vec![
            "Name must be between 2 and 100 characters".to_string(),
            "Message must be between 10 and 2000 characters".to_string(),
        ]);
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "Validation failed");
        assert_eq!(err.client_details().map(|d| d.len()), Some(2));
    }

    #[test]
    fn test_persistence_error_hides_source() {
        let err = AppError::persistence(
            "Failed to submit message. Please try again later.",
            AppError::Storage("connection refused to 10.0.0.3".to_string()),
        );
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("10.0.0.3"));
        assert!(err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let err = AppError::RateLimited {
            retry_after_secs: 3600,
        };
        assert_eq!(err.http_status_code(), 429);
        assert_eq!(err.retry_after_secs(), Some(3600));
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_auth_errors_status_codes() {
        assert_eq!(
            AppError::Unauthorized("Unauthorized".into()).http_status_code(),
            401
        );
        assert_eq!(
            AppError::Forbidden("Admin access required".into()).http_status_code(),
            403
        );
        assert_eq!(AppError::MethodNotAllowed.http_status_code(), 405);
    }

    #[test]
    fn test_content_integrity_is_client_error_logged_as_warning() {
        let err = AppError::ContentIntegrity("File content does not match".into());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert_eq!(err.error_code(), "CONTENT_INTEGRITY");
    }

    #[test]
    fn test_json_error_becomes_invalid_payload() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = json_err.into();
        assert_eq!(err.client_message(), "Invalid request body");
        assert_eq!(err.client_details().map(|d| d.len()), Some(1));
    }
}
