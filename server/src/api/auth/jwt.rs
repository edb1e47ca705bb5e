//! JWT access token handling

use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::types::UserRole;

/// JWT validation error
#[derive(Debug)]
pub enum JwtError {
    /// Token signature has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Other validation error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Access token has expired"),
            Self::InvalidSignature => write!(f, "Invalid access token signature"),
            Self::Invalid(msg) => write!(f, "Invalid access token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// JWT claims for access tokens
///
/// The role is informational; the verifier reloads the user and trusts the
/// stored role instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AccessClaims {
    pub fn new(user_id: &str, email: &str, role: UserRole, ttl_hours: u32) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(i64::from(ttl_hours));

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Create a signed JWT access token
pub fn create_access_token(signing_key: &[u8], claims: &AccessClaims) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode a JWT access token
pub fn validate_access_token(token: &str, signing_key: &[u8]) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data =
        decode::<AccessClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        vec![0u8; 32]
    }

    #[test]
    fn test_create_and_validate() {
        let key = test_key();
        let claims = AccessClaims::new("user123", "a@example.com", UserRole::Moderator, 24);
        let token = create_access_token(&key, &claims).unwrap();

        let decoded = validate_access_token(&token, &key).unwrap();
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.email, "a@example.com");
        assert_eq!(decoded.role, UserRole::Moderator);
        assert_eq!(decoded.exp - decoded.iat, 24 * 3600);
    }

    #[test]
    fn test_invalid_signature() {
        let claims = AccessClaims::new("u", "a@example.com", UserRole::User, 1);
        let token = create_access_token(&[0u8; 32], &claims).unwrap();
        assert!(matches!(
            validate_access_token(&token, &[1u8; 32]),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token() {
        let key = test_key();
        let mut claims = AccessClaims::new("u", "a@example.com", UserRole::User, 1);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = create_access_token(&key, &claims).unwrap();
        assert!(matches!(
            validate_access_token(&token, &key),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            validate_access_token("not-a-jwt", &test_key()),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_unique_jti() {
        let c1 = AccessClaims::new("u", "a@example.com", UserRole::User, 1);
        let c2 = AccessClaims::new("u", "a@example.com", UserRole::User, 1);
        assert_ne!(c1.jti, c2.jti);
    }
}
