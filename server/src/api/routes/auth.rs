//! Authentication API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{Auth, AuthManager, AuthState, require_auth};
use crate::api::extractors::ValidatedJson;
use crate::api::routes::users::types::UserProfileDto;
use crate::api::types::ApiError;
use crate::data::TransactionalService;
use crate::data::types::{UserRole, UserRow};
use crate::domain::accounts;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Account summary returned with a fresh token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

impl From<UserRow> for LoginUserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoginUserDto,
}

/// Identity resolved from the bearer token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

/// Auth state with database access
#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<TransactionalService>,
}

/// Build auth routes; `/me` sits behind the token check
pub fn routes(auth_manager: Arc<AuthManager>, database: Arc<TransactionalService>) -> Router<()> {
    let auth_state = AuthState {
        auth_manager: auth_manager.clone(),
        database: database.clone(),
    };
    let state = AuthRoutesState {
        auth_manager,
        database,
    };

    let protected = Router::new()
        .route("/me", get(me))
        .layer(axum::middleware::from_fn_with_state(auth_state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
        .merge(protected)
}

/// Create an account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserProfileDto),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register(
    State(state): State<AuthRoutesState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfileDto>), ApiError> {
    let repo = state.database.repository();
    let user = accounts::register(
        repo.as_ref(),
        &body.email,
        &body.password,
        &body.full_name,
        UserRole::User,
    )
    .await
    .map_err(ApiError::from_account)?;

    Ok((StatusCode::CREATED, Json(UserProfileDto::from(user))))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials or blocked account")
    )
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let repo = state.database.repository();
    let user = accounts::authenticate(repo.as_ref(), &body.email, &body.password)
        .await
        .map_err(ApiError::from_account)?;

    let access_token = state.auth_manager.issue_token(&user).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign access token");
        ApiError::internal("Failed to issue token")
    })?;

    tracing::debug!(user_id = %user.id, "Login succeeded");
    Ok(Json(LoginResponse {
        access_token,
        user: LoginUserDto::from(user),
    }))
}

/// Echo the caller's identity
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
pub async fn me(auth: Auth) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.ctx.user_id,
        email: auth.ctx.email,
        role: auth.ctx.role,
    })
}
