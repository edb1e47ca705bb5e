//! Authentication manager

use anyhow::Result;

use super::jwt::{AccessClaims, JwtError, create_access_token, validate_access_token};
use crate::core::config::AuthConfig;
use crate::data::types::UserRow;
use crate::utils::crypto;

/// Issues and validates access tokens
pub struct AuthManager {
    signing_key: Vec<u8>,
    token_ttl_hours: u32,
}

impl AuthManager {
    /// Initialize the authentication manager
    ///
    /// Without a configured secret a random key is generated, so tokens do
    /// not survive a restart.
    pub fn init(config: &AuthConfig) -> Self {
        let signing_key = match &config.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "No JWT secret configured; using a random key, tokens will not survive a restart"
                );
                crypto::generate_signing_key()
            }
        };

        tracing::debug!(ttl_hours = config.token_ttl_hours, "Auth manager initialized");
        Self {
            signing_key,
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    /// Issue an access token for a user
    pub fn issue_token(&self, user: &UserRow) -> Result<String> {
        let claims = AccessClaims::new(&user.id, &user.email, user.role, self.token_ttl_hours);
        create_access_token(&self.signing_key, &claims)
    }

    /// Validate an access token
    pub fn validate_token(&self, jwt: &str) -> Result<AccessClaims, JwtError> {
        validate_access_token(jwt, &self.signing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{UserRole, UserStatus};

    fn user() -> UserRow {
        UserRow {
            id: "u1".to_string(),
            email: "a@example.com".to_string(),
            password_hash: String::new(),
            full_name: "A".to_string(),
            avatar_url: None,
            role: UserRole::Admin,
            status: UserStatus::Active,
            uploads_count: 0,
            downloads_count: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_issue_and_validate_with_configured_secret() {
        let config = AuthConfig {
            jwt_secret: Some("0123456789abcdef".to_string()),
            token_ttl_hours: 2,
        };
        let token = AuthManager::init(&config).issue_token(&user()).unwrap();

        // A second manager with the same secret accepts the token
        let claims = AuthManager::init(&config).validate_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_random_keys_do_not_cross_validate() {
        let config = AuthConfig {
            jwt_secret: None,
            token_ttl_hours: 1,
        };
        let token = AuthManager::init(&config).issue_token(&user()).unwrap();
        assert!(AuthManager::init(&config).validate_token(&token).is_err());
    }
}
