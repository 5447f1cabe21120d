pub mod admission;
pub mod contact;
pub mod health;
pub mod upload;

use crate::error::HttpAppError;
use axum::http::StatusCode;
use campus_core::AppError;

/// Empty 200 for `OPTIONS` requests that reach a route. The CORS layer adds the
/// access-control headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// JSON 405 for any method a gateway route does not serve
pub async fn method_not_allowed() -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed)
}
