//! Access/refresh token issuance and verification.
//!
//! The access token is a short-lived signed JWT carrying the caller's
//! identity and role; the refresh token is an opaque random value stored
//! server-side against the user and rotated on every use.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::User;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in the access token. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_minutes: i64,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, access_ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_minutes,
        }
    }

    /// Issue a signed access token and a fresh opaque refresh token. The
    /// caller is responsible for persisting the refresh token on the user.
    pub fn issue(&self, user: &User) -> Result<TokenPair, TokenError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::minutes(self.access_ttl_minutes)).timestamp(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token: uuid::Uuid::new_v4().to_string(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::users;

    fn test_user() -> User {
        User {
            id: 7,
            name: "Shopper".to_string(),
            email: "shopper@example.com".to_string(),
            role: users::ROLE_USER.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new("unit-test-secret", 60);
        let pair = service.issue(&test_user()).unwrap();

        let claims = service.verify(&pair.access_token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "shopper@example.com");
        assert_eq!(claims.role, users::ROLE_USER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let service = TokenService::new("unit-test-secret", 60);
        let first = service.issue(&test_user()).unwrap();
        let second = service.issue(&test_user()).unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenService::new("secret-a", 60);
        let verifier = TokenService::new("secret-b", 60);

        let pair = issuer.issue(&test_user()).unwrap();
        assert!(matches!(
            verifier.verify(&pair.access_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = TokenService::new("unit-test-secret", -5);
        let pair = service.issue(&test_user()).unwrap();

        assert!(matches!(
            service.verify(&pair.access_token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = TokenService::new("unit-test-secret", 60);
        assert!(matches!(
            service.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }
}
