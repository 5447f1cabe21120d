//! Steps shared by the rate-limited form handlers

use crate::error::{RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
use crate::middleware::audit;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use campus_core::AppError;
use campus_infra::{RateLimitDecision, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Count the request against `identity`. Runs before the body is parsed, so
/// malformed requests use up quota too.
pub async fn enforce_rate_limit(
    limiter: &dyn RateLimiter,
    identity: &str,
    request_path: &str,
) -> Result<RateLimitDecision, AppError> {
    let decision = limiter.check(identity).await;
    if !decision.allowed {
        audit::log_rate_limit_exceeded(identity, request_path, decision.limit);
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        });
    }
    Ok(decision)
}

/// Parse the whole body into a payload schema. Anything that does not fit the
/// schema is rejected before field rules run.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    Ok(serde_json::from_slice(body)?)
}

/// `200 {success: true, message}` with the caller's remaining quota.
///
/// Honeypot hits get exactly this response too.
pub fn submission_success(message: &'static str, decision: &RateLimitDecision) -> Response {
    let mut response = Json(SubmissionResponse {
        success: true,
        message,
    })
    .into_response();

    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(
        RATE_LIMIT_REMAINING_HEADER,
        HeaderValue::from(decision.remaining),
    );
    response
}
