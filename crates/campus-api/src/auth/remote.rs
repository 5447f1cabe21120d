//! Token resolution by asking the identity service directly

use super::IdentityProvider;
use crate::constants::UNAUTHORIZED_MESSAGE;
use async_trait::async_trait;
use campus_core::{AppError, AuthenticatedUser};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Calls `GET {auth_url}/user` with the caller's token
///
/// Revoked sessions are caught here, which local JWT verification cannot do,
/// at the cost of one round trip per upload.
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    user_url: String,
    api_key: Option<String>,
}

impl RemoteIdentityProvider {
    pub fn new(auth_url: &str, api_key: Option<String>) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build identity service client: {}", e))?;

        Ok(Self {
            client,
            user_url: format!("{}/user", auth_url.trim_end_matches('/')),
            api_key,
        })
    }

    fn unauthorized() -> AppError {
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut request = self.client.get(&self.user_url).bearer_auth(token);
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, url = %self.user_url, "Identity service unreachable");
            Self::unauthorized()
        })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Identity service rejected token");
            return Err(Self::unauthorized());
        }

        let user: UserResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Identity service returned an unexpected user payload");
            Self::unauthorized()
        })?;

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
        })
    }
}
