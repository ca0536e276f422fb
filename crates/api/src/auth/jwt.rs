//! Validation of access tokens issued by the hosted auth provider.
//!
//! The provider signs HS256 JWTs with the project's JWT secret. Tokens are
//! only verified here, never minted.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use verde_core::types::DbId;

/// Audience the provider puts on tokens of signed-in users.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Claims read from a provider access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the provider's user id, which keys the `users` table.
    pub sub: DbId,
    #[serde(default)]
    pub email: Option<String>,
    /// Provider-level role (`authenticated`, `service_role`, ...).
    #[serde(default)]
    pub role: Option<String>,
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Configuration for access-token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Load from `SUPABASE_JWT_SECRET` (required) and `SUPABASE_JWT_AUDIENCE`
    /// (default `authenticated`).
    ///
    /// # Panics
    ///
    /// Panics if `SUPABASE_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SUPABASE_JWT_SECRET")
            .expect("SUPABASE_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SUPABASE_JWT_SECRET must not be empty");

        let audience =
            std::env::var("SUPABASE_JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.into());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiry and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    fn claims_for(sub: DbId, exp_offset_secs: i64, aud: &str) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub,
            email: Some("pm@example.com".into()),
            role: Some("authenticated".into()),
            aud: aud.into(),
            exp: now + exp_offset_secs,
            iat: Some(now),
        }
    }

    #[test]
    fn valid_token_round_trips_subject() {
        let config = test_config();
        let user = Uuid::new_v4();
        let token = sign(&claims_for(user, 3600, DEFAULT_AUDIENCE), &config.secret);

        let claims = validate_token(&token, &config).expect("token should validate");
        assert_eq!(claims.sub, user);
        assert_eq!(claims.email.as_deref(), Some("pm@example.com"));
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        // Well beyond the default 60-second leeway.
        let token = sign(&claims_for(Uuid::new_v4(), -300, DEFAULT_AUDIENCE), &config.secret);
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn wrong_audience_fails() {
        let config = test_config();
        let token = sign(&claims_for(Uuid::new_v4(), 3600, "anon"), &config.secret);
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn different_secret_fails() {
        let config = test_config();
        let token = sign(&claims_for(Uuid::new_v4(), 3600, DEFAULT_AUDIENCE), "secret-bravo");
        assert!(validate_token(&token, &config).is_err());
    }
}
