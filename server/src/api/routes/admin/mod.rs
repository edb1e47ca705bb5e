//! Admin and moderation API endpoints
//!
//! Each route names its role allow-list through `StaffOnly` (ADMIN or
//! MODERATOR) or `AdminOnly`. Mutations append to the audit trail.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};

use crate::api::auth::{AdminOnly, StaffOnly};
use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::routes::documents::types::{DocumentDto, UploaderDto};
use crate::api::routes::users::types::UserProfileDto;
use crate::api::types::{ApiError, MessageResponse, PaginatedResponse};
use crate::data::types::{
    DocumentStatus, MajorPatch, MajorWithSubjects, NewSubject, StatsDelta, SubjectPatch,
    UserRole, UserStatus,
};
use crate::data::{DataError, TransactionalRepository, TransactionalService};
use crate::domain::audit::{self, AuditAction};
use crate::domain::{accounts, counters};

use types::{
    AdminDocumentsQuery, CreateMajorRequest, CreateSubjectRequest, ListUsersQuery, MajorDto,
    ResetPasswordResponse, SetRoleRequest, SubjectDto, UpdateMajorRequest, UpdateSubjectRequest,
};

/// Shared state for Admin API endpoints
#[derive(Clone)]
pub struct AdminApiState {
    pub database: Arc<TransactionalService>,
    pub public_url: Arc<str>,
}

/// Build Admin API routes
pub fn routes(database: Arc<TransactionalService>, public_url: &str) -> Router<()> {
    let state = AdminApiState {
        database,
        public_url: Arc::from(public_url),
    };

    Router::new()
        // Users
        .route("/users", get(list_users))
        .route("/users/{id}", delete(delete_user))
        .route("/users/{id}/block", post(block_user))
        .route("/users/{id}/unblock", post(unblock_user))
        .route("/users/{id}/reset-password", post(reset_password))
        .route("/users/{id}/role", patch(set_role))
        // Documents
        .route("/documents", get(list_documents))
        .route("/documents/{id}", delete(delete_document))
        .route("/documents/{id}/block", post(block_document))
        .route("/documents/{id}/unblock", post(unblock_document))
        // Taxonomy
        .route("/subjects", get(list_subjects).post(create_subject))
        .route(
            "/subjects/{id}",
            patch(update_subject).delete(delete_subject),
        )
        .route("/majors", get(list_majors).post(create_major))
        .route("/majors/{id}", patch(update_major).delete(delete_major))
        .with_state(state)
}

fn user_not_found() -> ApiError {
    ApiError::not_found("USER_NOT_FOUND", "User not found")
}

fn document_not_found() -> ApiError {
    ApiError::not_found("DOCUMENT_NOT_FOUND", "Document not found")
}

fn subject_not_found() -> ApiError {
    ApiError::not_found("SUBJECT_NOT_FOUND", "Subject not found")
}

fn subject_exists() -> ApiError {
    ApiError::conflict("SUBJECT_EXISTS", "Subject code or name already exists")
}

fn major_not_found() -> ApiError {
    ApiError::not_found("MAJOR_NOT_FOUND", "Major not found")
}

fn major_exists() -> ApiError {
    ApiError::conflict("MAJOR_EXISTS", "Major name already exists")
}

/// Map a unique-constraint race onto the resource's conflict error
fn conflict_as(e: DataError, conflict: fn() -> ApiError) -> ApiError {
    match e {
        DataError::Conflict(_) => conflict(),
        e => ApiError::from_data(e),
    }
}

// ============================================================================
// Users
// ============================================================================

/// List accounts in every status
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Accounts with pagination metadata"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer" = []))
)]
pub async fn list_users(
    State(state): State<AdminApiState>,
    _auth: StaffOnly,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<UserProfileDto>>, ApiError> {
    let params = query.to_params();
    let (rows, total) = state
        .database
        .repository()
        .list_users(&params)
        .await
        .map_err(ApiError::from_data)?;

    let data = rows.into_iter().map(UserProfileDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page,
        params.limit,
        total,
    )))
}

async fn change_user_status(
    state: &AdminApiState,
    actor_id: &str,
    user_id: &str,
    status: UserStatus,
) -> Result<Json<UserProfileDto>, ApiError> {
    let repo = state.database.repository();
    let change = repo
        .set_user_status(user_id, status)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;

    let (delta, action) = match status {
        UserStatus::Blocked => (-1, AuditAction::BlockUser),
        UserStatus::Active => (1, AuditAction::UnblockUser),
    };
    if change.changed {
        counters::bump_platform(repo.as_ref(), StatsDelta::active_users(delta)).await;
    }
    audit::record(repo.as_ref(), actor_id, action, Some(user_id)).await;

    tracing::info!(
        actor_id = %actor_id,
        user_id = %user_id,
        status = %status,
        changed = change.changed,
        "User status set"
    );
    Ok(Json(UserProfileDto::from(change.row)))
}

/// Block an account
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/block",
    tag = "admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account blocked", body = UserProfileDto),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn block_user(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(user_id): IdPath,
) -> Result<Json<UserProfileDto>, ApiError> {
    change_user_status(&state, &auth.ctx.user_id, &user_id, UserStatus::Blocked).await
}

/// Unblock an account
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/unblock",
    tag = "admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account unblocked", body = UserProfileDto),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn unblock_user(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(user_id): IdPath,
) -> Result<Json<UserProfileDto>, ApiError> {
    change_user_status(&state, &auth.ctx.user_id, &user_id, UserStatus::Active).await
}

/// Reset a password to the fixed placeholder
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reset-password",
    tag = "admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Password reset", body = ResetPasswordResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn reset_password(
    State(state): State<AdminApiState>,
    auth: AdminOnly,
    IdPath(user_id): IdPath,
) -> Result<Json<ResetPasswordResponse>, ApiError> {
    let repo = state.database.repository();
    let new_password = accounts::reset_password(repo.as_ref(), &user_id)
        .await
        .map_err(ApiError::from_account)?;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::ResetPassword,
        Some(&user_id),
    )
    .await;

    tracing::info!(actor_id = %auth.ctx.user_id, user_id = %user_id, "Password reset");
    Ok(Json(ResetPasswordResponse {
        message: "Password has been reset".to_string(),
        new_password: new_password.to_string(),
    }))
}

/// Delete an account; its documents are kept
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_user(
    State(state): State<AdminApiState>,
    auth: AdminOnly,
    IdPath(user_id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = state.database.repository();
    let deleted = repo
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;

    if deleted.status == UserStatus::Active {
        counters::bump_platform(repo.as_ref(), StatsDelta::active_users(-1)).await;
    }
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::DeleteUser,
        Some(&user_id),
    )
    .await;

    tracing::info!(actor_id = %auth.ctx.user_id, user_id = %user_id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Overwrite an account's role
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    tag = "admin",
    params(("id" = String, Path, description = "User ID")),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserProfileDto),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn set_role(
    State(state): State<AdminApiState>,
    auth: AdminOnly,
    IdPath(user_id): IdPath,
    ValidatedJson(body): ValidatedJson<SetRoleRequest>,
) -> Result<Json<UserProfileDto>, ApiError> {
    let role = UserRole::parse(body.role.trim()).ok_or_else(|| {
        ApiError::bad_request("INVALID_ROLE", "Role must be USER, MODERATOR or ADMIN")
    })?;

    let repo = state.database.repository();
    let user = repo
        .set_user_role(&user_id, role)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::SetRole,
        Some(&user_id),
    )
    .await;

    tracing::info!(actor_id = %auth.ctx.user_id, user_id = %user_id, role = %role, "Role set");
    Ok(Json(UserProfileDto::from(user)))
}

// ============================================================================
// Documents
// ============================================================================

/// List documents in every status
#[utoipa::path(
    get,
    path = "/api/admin/documents",
    tag = "admin",
    params(AdminDocumentsQuery),
    responses(
        (status = 200, description = "Documents with pagination metadata"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer" = []))
)]
pub async fn list_documents(
    State(state): State<AdminApiState>,
    _auth: StaffOnly,
    ValidatedQuery(query): ValidatedQuery<AdminDocumentsQuery>,
) -> Result<Json<PaginatedResponse<DocumentDto>>, ApiError> {
    let params = query.to_params();
    let (rows, total) = state
        .database
        .repository()
        .list_documents(&params)
        .await
        .map_err(ApiError::from_data)?;

    let data = rows
        .into_iter()
        .map(|row| {
            DocumentDto::new(
                row.document,
                row.uploader.map(UploaderDto::with_email),
                &state.public_url,
            )
        })
        .collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page,
        params.limit,
        total,
    )))
}

async fn change_document_status(
    state: &AdminApiState,
    actor_id: &str,
    document_id: &str,
    status: DocumentStatus,
    action: AuditAction,
) -> Result<Json<DocumentDto>, ApiError> {
    let repo = state.database.repository();
    repo.set_document_status(document_id, status)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(document_not_found)?;
    audit::record(repo.as_ref(), actor_id, action, Some(document_id)).await;

    let document = repo
        .get_document(document_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(document_not_found)?;

    tracing::info!(
        actor_id = %actor_id,
        document_id = %document_id,
        status = %status,
        "Document status set"
    );
    Ok(Json(DocumentDto::new(
        document.document,
        document.uploader.map(UploaderDto::with_email),
        &state.public_url,
    )))
}

/// Hide a document from public listings
#[utoipa::path(
    post,
    path = "/api/admin/documents/{id}/block",
    tag = "admin",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document blocked", body = DocumentDto),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub async fn block_document(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(document_id): IdPath,
) -> Result<Json<DocumentDto>, ApiError> {
    change_document_status(
        &state,
        &auth.ctx.user_id,
        &document_id,
        DocumentStatus::Blocked,
        AuditAction::BlockDocument,
    )
    .await
}

/// Make a document visible again
#[utoipa::path(
    post,
    path = "/api/admin/documents/{id}/unblock",
    tag = "admin",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document visible", body = DocumentDto),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub async fn unblock_document(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(document_id): IdPath,
) -> Result<Json<DocumentDto>, ApiError> {
    change_document_status(
        &state,
        &auth.ctx.user_id,
        &document_id,
        DocumentStatus::Visible,
        AuditAction::UnblockDocument,
    )
    .await
}

/// Delete any document
#[utoipa::path(
    delete,
    path = "/api/admin/documents/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_document(
    State(state): State<AdminApiState>,
    auth: AdminOnly,
    IdPath(document_id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = state.database.repository();
    let removed = repo
        .delete_document(&document_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(document_not_found)?;

    counters::record_removal(repo.as_ref(), &removed.uploader_id).await;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::DeleteDocument,
        Some(&document_id),
    )
    .await;

    tracing::info!(actor_id = %auth.ctx.user_id, document_id = %document_id, "Document deleted");
    Ok(Json(MessageResponse::new("Document deleted successfully")))
}

// ============================================================================
// Subjects
// ============================================================================

/// List subjects by name
#[utoipa::path(
    get,
    path = "/api/admin/subjects",
    tag = "admin",
    responses((status = 200, description = "All subjects", body = Vec<SubjectDto>)),
    security(("bearer" = []))
)]
pub async fn list_subjects(
    State(state): State<AdminApiState>,
    _auth: StaffOnly,
) -> Result<Json<Vec<SubjectDto>>, ApiError> {
    let subjects = state
        .database
        .repository()
        .list_subjects()
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(subjects.into_iter().map(SubjectDto::from).collect()))
}

/// Create a subject with a unique code and name
#[utoipa::path(
    post,
    path = "/api/admin/subjects",
    tag = "admin",
    request_body = CreateSubjectRequest,
    responses(
        (status = 200, description = "Subject created", body = SubjectDto),
        (status = 409, description = "Code or name already exists")
    ),
    security(("bearer" = []))
)]
pub async fn create_subject(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    ValidatedJson(body): ValidatedJson<CreateSubjectRequest>,
) -> Result<Json<SubjectDto>, ApiError> {
    let code = body.code.trim().to_string();
    let name = body.name.trim().to_string();

    let repo = state.database.repository();
    if repo
        .subject_exists(Some(&code), Some(&name), None)
        .await
        .map_err(ApiError::from_data)?
    {
        return Err(subject_exists());
    }

    let subject = repo
        .create_subject(&NewSubject {
            code,
            name,
            managing_faculty: body.managing_faculty,
        })
        .await
        .map_err(|e| conflict_as(e, subject_exists))?;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::CreateSubject,
        Some(&subject.id),
    )
    .await;

    Ok(Json(SubjectDto::from(subject)))
}

/// Update a subject; code and name stay unique
#[utoipa::path(
    patch,
    path = "/api/admin/subjects/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Subject ID")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectDto),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Code or name already exists")
    ),
    security(("bearer" = []))
)]
pub async fn update_subject(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(subject_id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateSubjectRequest>,
) -> Result<Json<SubjectDto>, ApiError> {
    let patch = SubjectPatch {
        code: body.code.map(|code| code.trim().to_string()),
        name: body.name.map(|name| name.trim().to_string()),
        managing_faculty: body.managing_faculty,
    };

    let repo = state.database.repository();
    repo.get_subject(&subject_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(subject_not_found)?;
    if repo
        .subject_exists(patch.code.as_deref(), patch.name.as_deref(), Some(&subject_id))
        .await
        .map_err(ApiError::from_data)?
    {
        return Err(subject_exists());
    }

    let subject = repo
        .update_subject(&subject_id, &patch)
        .await
        .map_err(|e| conflict_as(e, subject_exists))?
        .ok_or_else(subject_not_found)?;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::UpdateSubject,
        Some(&subject_id),
    )
    .await;

    Ok(Json(SubjectDto::from(subject)))
}

/// Delete a subject; majors keep their references
#[utoipa::path(
    delete,
    path = "/api/admin/subjects/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = MessageResponse),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_subject(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(subject_id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = state.database.repository();
    if !repo
        .delete_subject(&subject_id)
        .await
        .map_err(ApiError::from_data)?
    {
        return Err(subject_not_found());
    }
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::DeleteSubject,
        Some(&subject_id),
    )
    .await;

    Ok(Json(MessageResponse::new("Subject deleted successfully")))
}

// ============================================================================
// Majors
// ============================================================================

async fn find_major(
    repo: &dyn TransactionalRepository,
    major_id: &str,
) -> Result<MajorWithSubjects, ApiError> {
    repo.list_majors()
        .await
        .map_err(ApiError::from_data)?
        .into_iter()
        .find(|m| m.major.id == major_id)
        .ok_or_else(major_not_found)
}

/// List majors by name with their subjects
#[utoipa::path(
    get,
    path = "/api/admin/majors",
    tag = "admin",
    responses((status = 200, description = "All majors", body = Vec<MajorDto>)),
    security(("bearer" = []))
)]
pub async fn list_majors(
    State(state): State<AdminApiState>,
    _auth: StaffOnly,
) -> Result<Json<Vec<MajorDto>>, ApiError> {
    let majors = state
        .database
        .repository()
        .list_majors()
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(majors.into_iter().map(MajorDto::from).collect()))
}

/// Create a major with a unique name
#[utoipa::path(
    post,
    path = "/api/admin/majors",
    tag = "admin",
    request_body = CreateMajorRequest,
    responses(
        (status = 200, description = "Major created", body = MajorDto),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer" = []))
)]
pub async fn create_major(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    ValidatedJson(body): ValidatedJson<CreateMajorRequest>,
) -> Result<Json<MajorDto>, ApiError> {
    let name = body.name.trim().to_string();

    let repo = state.database.repository();
    if repo
        .major_name_exists(&name, None)
        .await
        .map_err(ApiError::from_data)?
    {
        return Err(major_exists());
    }

    let major = repo
        .create_major(&name, &body.subjects)
        .await
        .map_err(|e| conflict_as(e, major_exists))?;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::CreateMajor,
        Some(&major.id),
    )
    .await;

    Ok(Json(MajorDto::from(find_major(repo.as_ref(), &major.id).await?)))
}

/// Rename a major or replace its subjects
#[utoipa::path(
    patch,
    path = "/api/admin/majors/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Major ID")),
    request_body = UpdateMajorRequest,
    responses(
        (status = 200, description = "Major updated", body = MajorDto),
        (status = 404, description = "Major not found"),
        (status = 409, description = "Name already exists")
    ),
    security(("bearer" = []))
)]
pub async fn update_major(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(major_id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateMajorRequest>,
) -> Result<Json<MajorDto>, ApiError> {
    let patch = MajorPatch {
        name: body.name.map(|name| name.trim().to_string()),
        subject_ids: body.subjects,
    };

    let repo = state.database.repository();
    find_major(repo.as_ref(), &major_id).await?;
    if let Some(ref name) = patch.name
        && repo
            .major_name_exists(name, Some(&major_id))
            .await
            .map_err(ApiError::from_data)?
    {
        return Err(major_exists());
    }

    repo.update_major(&major_id, &patch)
        .await
        .map_err(|e| conflict_as(e, major_exists))?
        .ok_or_else(major_not_found)?;
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::UpdateMajor,
        Some(&major_id),
    )
    .await;

    Ok(Json(MajorDto::from(find_major(repo.as_ref(), &major_id).await?)))
}

/// Delete a major
#[utoipa::path(
    delete,
    path = "/api/admin/majors/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Major ID")),
    responses(
        (status = 200, description = "Major deleted", body = MessageResponse),
        (status = 404, description = "Major not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_major(
    State(state): State<AdminApiState>,
    auth: StaffOnly,
    IdPath(major_id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = state.database.repository();
    if !repo
        .delete_major(&major_id)
        .await
        .map_err(ApiError::from_data)?
    {
        return Err(major_not_found());
    }
    audit::record(
        repo.as_ref(),
        &auth.ctx.user_id,
        AuditAction::DeleteMajor,
        Some(&major_id),
    )
    .await;

    Ok(Json(MessageResponse::new("Major deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::api::test_support::TestApp;
    use crate::data::types::UserRole;

    #[tokio::test]
    async fn test_role_change_grants_and_revokes_moderation() {
        let app = TestApp::new().await;
        let (owner_id, owner_token) = app.user("owner@example.com", "Owner").await;
        let (user_id, token) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        let document = app.upload_text(&owner_token, "Notes").await;
        let block_path = format!("/api/admin/documents/{}/block", document["id"].as_str().unwrap());
        let role_path = format!("/api/admin/users/{user_id}/role");

        let (status, body) = app.request(Method::POST, &block_path, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INSUFFICIENT_ROLE");

        let (status, profile) = app
            .request(
                Method::PATCH,
                &role_path,
                Some(&admin_token),
                Some(json!({"role": "MODERATOR"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["role"], "MODERATOR");

        // Same token; the role is read from the stored account on each request
        let (status, blocked) = app.request(Method::POST, &block_path, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(blocked["status"], "BLOCKED");
        assert_eq!(blocked["uploader"]["email"], "owner@example.com");
        assert_eq!(blocked["uploaderId"], owner_id.as_str());

        app.request(
            Method::PATCH,
            &role_path,
            Some(&admin_token),
            Some(json!({"role": "USER"})),
        )
        .await;
        let (status, _) = app.request(Method::POST, &block_path, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_only_routes_reject_moderators() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (_, moderator_token) = app.staff("mod@example.com", UserRole::Moderator).await;

        let cases = [
            (Method::POST, format!("/api/admin/users/{user_id}/reset-password")),
            (Method::DELETE, format!("/api/admin/users/{user_id}")),
            (Method::DELETE, "/api/admin/documents/abc".to_string()),
        ];
        for (method, path) in cases {
            let (status, _) = app.request(method, &path, Some(&moderator_token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        }

        let (status, _) = app
            .request(
                Method::PATCH,
                &format!("/api/admin/users/{user_id}/role"),
                Some(&moderator_token),
                Some(json!({"role": "ADMIN"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .request(Method::GET, "/api/admin/users", Some(&moderator_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_block_unblock_counts_active_users_once() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        assert_eq!(app.platform_stats().await.active_users, 2);

        let block = format!("/api/admin/users/{user_id}/block");
        for _ in 0..2 {
            let (status, profile) = app.request(Method::POST, &block, Some(&admin_token), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(profile["status"], "BLOCKED");
        }
        assert_eq!(app.platform_stats().await.active_users, 1);

        let (status, _) = app
            .request(
                Method::POST,
                &format!("/api/admin/users/{user_id}/unblock"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.platform_stats().await.active_users, 2);

        let (status, body) = app
            .request(Method::POST, "/api/admin/users/missing/block", Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reset_password_and_delete_user() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;

        let (status, body) = app
            .request(
                Method::POST,
                &format!("/api/admin/users/{user_id}/reset-password"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["newPassword"], "123456");

        let (status, _) = app
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "u@example.com", "password": "123456"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .request(
                Method::DELETE,
                &format!("/api/admin/users/{user_id}"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.platform_stats().await.active_users, 1);

        let (status, _) = app
            .request(
                Method::DELETE,
                &format!("/api/admin/users/{user_id}"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_set_role_rejects_unknown_role() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;

        let (status, body) = app
            .request(
                Method::PATCH,
                &format!("/api/admin/users/{user_id}/role"),
                Some(&admin_token),
                Some(json!({"role": "SUPERUSER"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ROLE");
    }

    #[tokio::test]
    async fn test_admin_listings_include_every_status() {
        let app = TestApp::new().await;
        let (_, token) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        let visible = app.upload_text(&token, "Visible notes").await;
        let hidden = app.upload_text(&token, "Hidden notes").await;
        app.request(
            Method::POST,
            &format!("/api/admin/documents/{}/block", hidden["id"].as_str().unwrap()),
            Some(&admin_token),
            None,
        )
        .await;

        let (status, all) = app
            .request(Method::GET, "/api/admin/documents", Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all["pagination"]["total"], 2);

        let (_, blocked) = app
            .request(
                Method::GET,
                "/api/admin/documents?status=BLOCKED",
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(blocked["pagination"]["total"], 1);
        assert_eq!(blocked["data"][0]["id"], hidden["id"]);

        let (_, public) = app
            .request(Method::GET, "/api/documents", Some(&token), None)
            .await;
        assert_eq!(public["pagination"]["total"], 1);
        assert_eq!(public["data"][0]["id"], visible["id"]);

        let (_, users) = app
            .request(
                Method::GET,
                "/api/admin/users?search=ADMIN@&sortBy=email",
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(users["pagination"]["total"], 1);
        assert_eq!(users["data"][0]["email"], "admin@example.com");
    }

    #[tokio::test]
    async fn test_admin_delete_document_adjusts_counters() {
        let app = TestApp::new().await;
        let (user_id, token) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        let document = app.upload_text(&token, "Notes").await;

        let (status, _) = app
            .request(
                Method::DELETE,
                &format!("/api/admin/documents/{}", document["id"].as_str().unwrap()),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.platform_stats().await.total_uploads, 0);
        let owner = app
            .database
            .repository()
            .get_user(&user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.uploads_count, 0);
    }

    #[tokio::test]
    async fn test_subject_round_trip() {
        let app = TestApp::new().await;
        let (_, token) = app.staff("mod@example.com", UserRole::Moderator).await;

        let (status, subject) = app
            .request(
                Method::POST,
                "/api/admin/subjects",
                Some(&token),
                Some(json!({"code": "CS101", "name": "Intro"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let id = subject["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .request(
                Method::POST,
                "/api/admin/subjects",
                Some(&token),
                Some(json!({"code": "CS101", "name": "Other"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "SUBJECT_EXISTS");

        let (status, renamed) = app
            .request(
                Method::PATCH,
                &format!("/api/admin/subjects/{id}"),
                Some(&token),
                Some(json!({"name": "Introduction"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["code"], "CS101");

        let (status, _) = app
            .request(
                Method::POST,
                "/api/admin/subjects",
                Some(&token),
                Some(json!({"code": "CS101", "name": "Intro"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .request(
                Method::POST,
                "/api/admin/subjects",
                Some(&token),
                Some(json!({"code": "CS102", "name": "Intro"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .request(Method::DELETE, "/api/admin/subjects/missing", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SUBJECT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_missing_taxonomy_is_not_found_before_conflict() {
        let app = TestApp::new().await;
        let (_, token) = app.staff("mod@example.com", UserRole::Moderator).await;

        let (status, _) = app
            .request(
                Method::POST,
                "/api/admin/subjects",
                Some(&token),
                Some(json!({"code": "CS101", "name": "Intro"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app
            .request(
                Method::POST,
                "/api/admin/majors",
                Some(&token),
                Some(json!({"name": "Computer Science"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .request(
                Method::PATCH,
                "/api/admin/subjects/missing",
                Some(&token),
                Some(json!({"code": "CS101"})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SUBJECT_NOT_FOUND");

        let (status, body) = app
            .request(
                Method::PATCH,
                "/api/admin/majors/missing",
                Some(&token),
                Some(json!({"name": "Computer Science"})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "MAJOR_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_majors_resolve_subjects_and_skip_deleted() {
        let app = TestApp::new().await;
        let (_, token) = app.staff("admin@example.com", UserRole::Admin).await;

        let mut ids = Vec::new();
        for (code, name) in [("PHY", "Physics"), ("ALG", "Algebra")] {
            let (_, subject) = app
                .request(
                    Method::POST,
                    "/api/admin/subjects",
                    Some(&token),
                    Some(json!({"code": code, "name": name})),
                )
                .await;
            ids.push(subject["id"].as_str().unwrap().to_string());
        }

        let (status, major) = app
            .request(
                Method::POST,
                "/api/admin/majors",
                Some(&token),
                Some(json!({"name": "Science", "subjects": [ids[0], ids[1], "unknown"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<_> = major["subjects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["code"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(codes, vec!["PHY", "ALG"]);

        let (status, body) = app
            .request(
                Method::POST,
                "/api/admin/majors",
                Some(&token),
                Some(json!({"name": "Science", "subjects": []})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "MAJOR_EXISTS");

        app.request(
            Method::DELETE,
            &format!("/api/admin/subjects/{}", ids[0]),
            Some(&token),
            None,
        )
        .await;

        let (_, majors) = app
            .request(Method::GET, "/api/admin/majors", Some(&token), None)
            .await;
        assert_eq!(majors[0]["subjects"], json!([{"id": ids[1], "code": "ALG", "name": "Algebra"}]));

        let major_id = major["id"].as_str().unwrap();
        let (status, updated) = app
            .request(
                Method::PATCH,
                &format!("/api/admin/majors/{major_id}"),
                Some(&token),
                Some(json!({"subjects": []})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Science");
        assert_eq!(updated["subjects"], json!([]));

        let (status, body) = app
            .request(Method::PATCH, "/api/admin/majors/missing", Some(&token), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "MAJOR_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_mutations_are_audited() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (admin_id, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;

        app.request(
            Method::POST,
            &format!("/api/admin/users/{user_id}/block"),
            Some(&admin_token),
            None,
        )
        .await;
        app.request(
            Method::POST,
            "/api/admin/subjects",
            Some(&admin_token),
            Some(json!({"code": "X1", "name": "X"})),
        )
        .await;

        let (logs, total) = app
            .database
            .repository()
            .list_audit_logs(1, 10)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(logs[0].action, "CREATE_SUBJECT");
        assert_eq!(logs[1].action, "BLOCK_USER");
        assert_eq!(logs[1].actor_id, admin_id);
        assert_eq!(logs[1].target_id.as_deref(), Some(user_id.as_str()));
    }
}
