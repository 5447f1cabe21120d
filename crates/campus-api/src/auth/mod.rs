//! Authorization gate for privileged writes
//!
//! A bearer credential is resolved to an identity by an [`IdentityProvider`];
//! buckets flagged `requires_admin` additionally need an `admin` row in the
//! role store. There is no role hierarchy beyond that single check.

pub mod extractor;
pub mod jwt;
pub mod remote;

use crate::constants::ADMIN_REQUIRED_MESSAGE;
use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use campus_core::{AppError, AppRole, AuthenticatedUser};
use campus_db::RoleStore;

pub use extractor::CurrentUser;
pub use jwt::JwtIdentityProvider;
pub use remote::RemoteIdentityProvider;

/// Turns a bearer token into an identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `AppError::Unauthorized` for any token that does not resolve.
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AppError>;
}

/// Token from `Authorization: Bearer <token>`. The scheme is case-insensitive;
/// an empty token counts as missing.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Require an `admin` membership for `user`.
pub async fn require_admin(roles: &dyn RoleStore, user: &AuthenticatedUser) -> Result<(), AppError> {
    let is_admin = roles
        .has_role(user.id, AppRole::Admin)
        .await
        .map_err(|e| AppError::persistence("Failed to verify permissions", e))?;

    if !is_admin {
        return Err(AppError::Forbidden(ADMIN_REQUIRED_MESSAGE.to_string()));
    }
    Ok(())
}
