//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::context::AuthContext;
use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::data::TransactionalService;

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    fn unauthorized(code: &'static str, message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code,
            message: message.to_string(),
        }
    }

    pub fn missing_token() -> Self {
        Self::unauthorized("MISSING_TOKEN", "Authentication required")
    }

    pub fn expired() -> Self {
        Self::unauthorized("TOKEN_EXPIRED", "Access token has expired")
    }

    pub fn invalid() -> Self {
        Self::unauthorized("INVALID_TOKEN", "Invalid access token")
    }

    pub fn user_not_found() -> Self {
        Self::unauthorized("USER_NOT_FOUND", "User not found")
    }

    pub fn user_blocked() -> Self {
        Self::unauthorized("USER_BLOCKED", "Account is blocked")
    }

    pub fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: "service_unavailable",
            code: "SERVICE_UNAVAILABLE",
            message: "Unable to verify credentials".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<TransactionalService>,
}

/// Bearer token from the Authorization header
fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware
///
/// Validates the bearer token, reloads the user by the token's email and
/// rejects missing or BLOCKED accounts.
///
/// Injects `AuthContext` into request extensions.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let jwt = bearer_token(&request).ok_or_else(AuthError::missing_token)?;

    let claims = state
        .auth_manager
        .validate_token(jwt)
        .map_err(|e| match e {
            JwtError::Expired => AuthError::expired(),
            e => {
                tracing::debug!(error = %e, "Rejected access token");
                AuthError::invalid()
            }
        })?;

    let user = state
        .database
        .repository()
        .get_user_by_email(&claims.email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load user for token");
            AuthError::unavailable()
        })?
        .ok_or_else(AuthError::user_not_found)?;

    if user.is_blocked() {
        tracing::debug!(user_id = %user.id, "Blocked user presented a token");
        return Err(AuthError::user_blocked());
    }

    request.extensions_mut().insert(AuthContext {
        user_id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(auth: &str) -> Request {
        Request::builder()
            .header(header::AUTHORIZATION, auth)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&request_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&request_with("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&request_with("Basic abc")), None);
        assert_eq!(bearer_token(&request_with("Bearer ")), None);

        let empty = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&empty), None);
    }
}
