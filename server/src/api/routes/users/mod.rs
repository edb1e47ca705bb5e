//! User API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::{ApiError, MessageResponse};
use crate::data::TransactionalService;
use crate::data::types::{UserProfilePatch, UserRow};
use crate::domain::accounts;

use types::{ChangePasswordRequest, UpdateProfileRequest, UserProfileDto, UserStatsDto};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub database: Arc<TransactionalService>,
}

/// Build Users API routes
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = UsersApiState { database };

    Router::new()
        .route("/me/profile", get(get_my_profile).patch(update_my_profile))
        .route("/me/change-password", post(change_password))
        .route("/me/stats", get(get_my_stats))
        .route("/profile/{id}", get(get_profile))
        .route("/{id}/stats", get(get_user_stats))
        .with_state(state)
}

async fn load_user(state: &UsersApiState, user_id: &str) -> Result<UserRow, ApiError> {
    state
        .database
        .repository()
        .get_user(user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/users/me/profile",
    tag = "users",
    responses(
        (status = 200, description = "Caller profile", body = UserProfileDto),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_my_profile(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<UserProfileDto>, ApiError> {
    let user = load_user(&state, &auth.ctx.user_id).await?;
    Ok(Json(UserProfileDto::from(user)))
}

/// Update the caller's name or avatar
#[utoipa::path(
    patch,
    path = "/api/users/me/profile",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfileDto),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_my_profile(
    State(state): State<UsersApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserProfileDto>, ApiError> {
    let patch = UserProfilePatch {
        full_name: body.full_name.map(|name| name.trim().to_string()),
        avatar_url: body.avatar_url,
    };

    let user = state
        .database
        .repository()
        .update_user_profile(&auth.ctx.user_id, &patch)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;

    Ok(Json(UserProfileDto::from(user)))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/api/users/me/change-password",
    tag = "users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect")
    ),
    security(("bearer" = []))
)]
pub async fn change_password(
    State(state): State<UsersApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = state.database.repository();
    accounts::change_password(
        repo.as_ref(),
        &auth.ctx.user_id,
        &body.current_password,
        &body.new_password,
    )
    .await
    .map_err(ApiError::from_account)?;

    tracing::info!(user_id = %auth.ctx.user_id, "Password changed");
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Get another account's profile
#[utoipa::path(
    get,
    path = "/api/users/profile/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserProfileDto),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_profile(
    State(state): State<UsersApiState>,
    _auth: Auth,
    IdPath(user_id): IdPath,
) -> Result<Json<UserProfileDto>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    Ok(Json(UserProfileDto::from(user)))
}

/// Get the caller's upload and download totals
#[utoipa::path(
    get,
    path = "/api/users/me/stats",
    tag = "users",
    responses((status = 200, description = "Caller statistics", body = UserStatsDto)),
    security(("bearer" = []))
)]
pub async fn get_my_stats(
    State(state): State<UsersApiState>,
    auth: Auth,
) -> Result<Json<UserStatsDto>, ApiError> {
    let user = load_user(&state, &auth.ctx.user_id).await?;
    Ok(Json(UserStatsDto::from(&user)))
}

/// Get an account's upload and download totals
#[utoipa::path(
    get,
    path = "/api/users/{id}/stats",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User statistics", body = UserStatsDto),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_user_stats(
    State(state): State<UsersApiState>,
    _auth: Auth,
    IdPath(user_id): IdPath,
) -> Result<Json<UserStatsDto>, ApiError> {
    let user = load_user(&state, &user_id).await?;
    Ok(Json(UserStatsDto::from(&user)))
}
