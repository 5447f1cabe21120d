use campus_api::auth::jwt::AccessTokenClaims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Secret shared by the test config and minted tokens
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-at-least-32-chars";

/// Signed access token for `user_id`, valid for an hour
pub fn mint_token(user_id: Uuid) -> String {
    let claims = AccessTokenClaims {
        sub: user_id.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        email: Some(format!("{}@school.example", user_id.simple())),
        aud: Some(serde_json::json!("authenticated")),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", mint_token(user_id))
}
