//! Account lifecycle: registration, credential checks and password changes

use thiserror::Error;

use super::counters;
use crate::core::constants::RESET_PASSWORD_VALUE;
use crate::data::types::{NewUser, StatsDelta, UserRole, UserRow};
use crate::data::{DataError, TransactionalRepository};
use crate::utils::crypto;

/// Errors from account operations
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Email already exists")]
    EmailExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is blocked")]
    Blocked,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("User not found")]
    NotFound,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password on the blocking pool
pub async fn hash_password(password: &str) -> Result<String, AccountError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || crypto::hash_password(&password))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, AccountError> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || crypto::verify_password(&password, &hash))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

/// Create an ACTIVE account and count it as an active user
pub async fn register(
    repo: &dyn TransactionalRepository,
    email: &str,
    password: &str,
    full_name: &str,
    role: UserRole,
) -> Result<UserRow, AccountError> {
    let email = normalize_email(email);
    if repo.get_user_by_email(&email).await?.is_some() {
        return Err(AccountError::EmailExists);
    }

    let password_hash = hash_password(password).await?;
    let user = repo
        .create_user(&NewUser {
            email,
            password_hash,
            full_name: full_name.trim().to_string(),
            role,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            DataError::Conflict(_) => AccountError::EmailExists,
            e => AccountError::Data(e),
        })?;

    counters::bump_platform(repo, StatsDelta::active_users(1)).await;

    tracing::info!(user_id = %user.id, role = %user.role, "Account registered");
    Ok(user)
}

/// Check credentials and return the account
///
/// A blocked account is rejected only after the password matched.
pub async fn authenticate(
    repo: &dyn TransactionalRepository,
    email: &str,
    password: &str,
) -> Result<UserRow, AccountError> {
    let user = repo
        .get_user_by_email(&normalize_email(email))
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash).await? {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(AccountError::InvalidCredentials);
    }

    if user.is_blocked() {
        tracing::debug!(user_id = %user.id, "Blocked account attempted login");
        return Err(AccountError::Blocked);
    }

    Ok(user)
}

/// Replace a password after checking the current one
pub async fn change_password(
    repo: &dyn TransactionalRepository,
    user_id: &str,
    current_password: &str,
    new_password: &str,
) -> Result<(), AccountError> {
    let user = repo.get_user(user_id).await?.ok_or(AccountError::NotFound)?;

    if !verify_password(current_password, &user.password_hash).await? {
        return Err(AccountError::WrongPassword);
    }

    let hash = hash_password(new_password).await?;
    if !repo.update_user_password(user_id, &hash).await? {
        return Err(AccountError::NotFound);
    }
    Ok(())
}

/// Overwrite a password with the fixed placeholder and return the plaintext
pub async fn reset_password(
    repo: &dyn TransactionalRepository,
    user_id: &str,
) -> Result<&'static str, AccountError> {
    let hash = hash_password(RESET_PASSWORD_VALUE).await?;
    if !repo.update_user_password(user_id, &hash).await? {
        return Err(AccountError::NotFound);
    }
    Ok(RESET_PASSWORD_VALUE)
}
