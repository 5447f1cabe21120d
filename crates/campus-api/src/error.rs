//! HTTP error response conversion
//!
//! Every failure on the gateway routes leaves through [`HttpAppError`], so the
//! client always receives a JSON envelope with an explicit status.
//!
//! **Handler pattern:** return `Result<_, HttpAppError>` and let `?` convert
//! `AppError` (or anything with an `Into<AppError>` path below).

use axum::{
    extract::rejection::BytesRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use campus_core::{AppError, ErrorMetadata, LogLevel};
use campus_processing::ValidationError;
use serde::Serialize;

pub const RETRY_AFTER_HEADER: &str = "Retry-After";
pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Every problem the client can fix, in field order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from campus-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Upload checks: a spoofed signature is a content-integrity violation, every
/// other refusal is ordinary bad input.
impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        if err.is_integrity_violation() {
            HttpAppError(AppError::ContentIntegrity(message))
        } else {
            HttpAppError(AppError::InvalidInput(message))
        }
    }
}

/// Body could not be read (too large, aborted, wrong framing)
impl From<BytesRejection> for HttpAppError {
    fn from(rejection: BytesRejection) -> Self {
        HttpAppError(AppError::InvalidPayload(rejection.body_text()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Sensitive variants never carry details, whatever the variant holds.
        let details = if app_error.is_sensitive() {
            None
        } else {
            app_error.client_details()
        };

        let mut response = (
            status,
            Json(ErrorResponse {
                error: app_error.client_message(),
                details,
            }),
        )
            .into_response();

        if let Some(retry_after) = app_error.retry_after_secs() {
            let headers = response.headers_mut();
            headers.insert(RETRY_AFTER_HEADER, HeaderValue::from(retry_after));
            headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from_static("0"));
        }

        response
    }
}
