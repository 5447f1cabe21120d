use crate::constants::UNAUTHORIZED_MESSAGE;
use crate::error::HttpAppError;
use crate::middleware::audit;
use crate::state::AppState;
use crate::utils::ip_extraction::client_ip_from_parts;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use campus_core::{AppError, AuthenticatedUser};
use std::sync::Arc;

use super::bearer_token;

/// Identity behind the request's bearer token
///
/// Rejects with 401 before the handler reads the body. Failures are audited
/// with the caller's address.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || HttpAppError(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()));

        let Some(token) = bearer_token(&parts.headers) else {
            let client_ip = client_ip_from_parts(parts, state.trusted_proxy_count());
            audit::log_authentication_failure(&client_ip, "Missing or malformed bearer token");
            return Err(unauthorized());
        };

        match state.identity.resolve(token).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(_) => {
                let client_ip = client_ip_from_parts(parts, state.trusted_proxy_count());
                audit::log_authentication_failure(&client_ip, "Invalid bearer token");
                Err(unauthorized())
            }
        }
    }
}
