//! Local verification of the identity service's HS256 access tokens

use super::IdentityProvider;
use crate::constants::UNAUTHORIZED_MESSAGE;
use async_trait::async_trait;
use campus_core::{AppError, AuthenticatedUser};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience the identity service stamps on end-user sessions
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims read from an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// String or array of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
}

impl AccessTokenClaims {
    fn audience_accepted(&self) -> bool {
        match &self.aud {
            None => true,
            Some(serde_json::Value::String(aud)) => aud == AUTHENTICATED_AUDIENCE,
            Some(serde_json::Value::Array(auds)) => auds
                .iter()
                .any(|aud| aud.as_str() == Some(AUTHENTICATED_AUDIENCE)),
            Some(_) => false,
        }
    }
}

pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        // Audience is optional on these tokens, so it is checked after decoding.
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    fn unauthorized() -> AppError {
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                Self::unauthorized()
            })?
            .claims;

        if !claims.audience_accepted() {
            tracing::debug!(aud = ?claims.aud, "Access token has unexpected audience");
            return Err(Self::unauthorized());
        }

        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::debug!("Access token subject is not a user id");
            Self::unauthorized()
        })?;

        Ok(AuthenticatedUser {
            id,
            email: claims.email,
        })
    }
}
