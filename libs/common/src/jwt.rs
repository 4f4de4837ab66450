//! Bearer token codec shared by the accounts and catalog services
//!
//! Tokens are HS256-signed JWTs carrying the user id as `sub`. The accounts
//! service issues them; the catalog service only validates them, so both
//! sides must be configured with the same `JWT_SECRET`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Issuer embedded in every token
pub const ISSUER: &str = "catalog";

/// Error type for token operations
#[derive(Debug, Error)]
pub enum JwtError {
    /// Configuration is missing or unusable
    #[error("JWT configuration error: {0}")]
    Configuration(String),

    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    Create(#[source] jsonwebtoken::errors::Error),

    /// Token is malformed, expired or signed with another key
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Access token expiration time in seconds (default: 24 hours)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC secret, at least 32 characters (required)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| {
            JwtError::Configuration("JWT_SECRET environment variable not set".to_string())
        })?;

        if secret.len() < 32 {
            return Err(JwtError::Configuration(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400);

        Ok(JwtConfig {
            secret,
            access_token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issuer
    pub iss: String,
    /// Issued at time
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

/// Signs and validates access tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_expiry: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;

        TokenService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_token_expiry: config.access_token_expiry,
        }
    }

    /// Generate an access token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let expiry = i64::try_from(self.access_token_expiry).unwrap_or(i64::MAX / 2);

        let claims = Claims {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now,
            exp: now.saturating_add(expiry),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(JwtError::Create)
    }

    /// Validate a token and return the claims
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(JwtError::Invalid)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.access_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            secret: secret.to_string(),
            access_token_expiry: 3600,
        })
    }

    #[test]
    fn issued_token_validates() {
        let tokens = service("a-test-secret-that-is-long-enough-for-hs256");
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = service("a-test-secret-that-is-long-enough-for-hs256");
        let verifier = service("another-secret-that-is-long-enough-for-hs256");

        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(verifier.validate(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "a-test-secret-that-is-long-enough-for-hs256";
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(service(secret).validate(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = service("a-test-secret-that-is-long-enough-for-hs256");
        assert!(tokens.validate("not-a-jwt").is_err());
    }
}
