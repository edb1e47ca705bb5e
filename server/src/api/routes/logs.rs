//! Audit log endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::auth::AdminOnly;
use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, PaginatedResponse, default_log_limit, default_page, timestamp};
use crate::data::TransactionalService;
use crate::data::types::{AuditLogRow, UserSummary};

#[derive(Clone)]
pub struct LogsApiState {
    pub database: Arc<TransactionalService>,
}

pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    Router::new()
        .route("/", get(list_logs))
        .with_state(LogsApiState { database })
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLogsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,
    #[serde(default = "default_log_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogActorDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

impl From<UserSummary> for LogActorDto {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            email: summary.email,
            full_name: summary.full_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogDto {
    pub id: String,
    /// `null` when the acting account has been deleted
    pub actor: Option<LogActorDto>,
    pub action: String,
    pub target_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<AuditLogRow> for AuditLogDto {
    fn from(row: AuditLogRow) -> Self {
        Self {
            id: row.id,
            actor: row.actor.map(LogActorDto::from),
            action: row.action,
            target_id: row.target_id,
            timestamp: timestamp(row.created_at),
        }
    }
}

/// Audit trail, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "logs",
    params(ListLogsQuery),
    responses(
        (status = 200, description = "Audit entries with pagination metadata"),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer" = []))
)]
pub async fn list_logs(
    State(state): State<LogsApiState>,
    _auth: AdminOnly,
    ValidatedQuery(query): ValidatedQuery<ListLogsQuery>,
) -> Result<Json<PaginatedResponse<AuditLogDto>>, ApiError> {
    let (rows, total) = state
        .database
        .repository()
        .list_audit_logs(query.page, query.limit)
        .await
        .map_err(ApiError::from_data)?;

    let data = rows.into_iter().map(AuditLogDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        query.page,
        query.limit,
        total,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::api::test_support::TestApp;
    use crate::data::types::UserRole;

    #[tokio::test]
    async fn test_logs_list_newest_first_with_actor() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (admin_id, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;

        for action in ["block", "unblock"] {
            app.request(
                Method::POST,
                &format!("/api/admin/users/{user_id}/{action}"),
                Some(&admin_token),
                None,
            )
            .await;
        }

        let (status, logs) = app
            .request(Method::GET, "/api/logs", Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logs["pagination"]["limit"], 20);
        assert_eq!(logs["pagination"]["total"], 2);
        assert_eq!(logs["data"][0]["action"], "UNBLOCK_USER");
        assert_eq!(logs["data"][1]["action"], "BLOCK_USER");
        assert_eq!(logs["data"][0]["targetId"], user_id.as_str());
        assert_eq!(logs["data"][0]["actor"]["id"], admin_id.as_str());
        assert_eq!(logs["data"][0]["actor"]["email"], "admin@example.com");

        let (_, page) = app
            .request(Method::GET, "/api/logs?page=2&limit=1", Some(&admin_token), None)
            .await;
        assert_eq!(page["data"][0]["action"], "BLOCK_USER");
        assert_eq!(page["pagination"]["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_deleted_actor_renders_null() {
        let app = TestApp::new().await;
        let (user_id, _) = app.user("u@example.com", "U").await;
        let (actor_id, actor_token) = app.staff("mod@example.com", UserRole::Moderator).await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;

        app.request(
            Method::POST,
            &format!("/api/admin/users/{user_id}/block"),
            Some(&actor_token),
            None,
        )
        .await;
        app.request(
            Method::DELETE,
            &format!("/api/admin/users/{actor_id}"),
            Some(&admin_token),
            None,
        )
        .await;

        let (_, logs) = app
            .request(Method::GET, "/api/logs", Some(&admin_token), None)
            .await;
        assert_eq!(logs["data"][0]["action"], "DELETE_USER");
        assert_eq!(logs["data"][1]["action"], "BLOCK_USER");
        assert!(logs["data"][1]["actor"].is_null());
    }

    #[tokio::test]
    async fn test_logs_are_admin_only() {
        let app = TestApp::new().await;
        let (_, token) = app.staff("mod@example.com", UserRole::Moderator).await;

        let (status, body) = app.request(Method::GET, "/api/logs", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INSUFFICIENT_ROLE");
    }

    #[tokio::test]
    async fn test_far_page_is_empty() {
        let app = TestApp::new().await;
        let (_, token) = app.staff("admin@example.com", UserRole::Admin).await;

        let (status, page) = app
            .request(
                Method::GET,
                "/api/logs?page=4294967295&limit=100",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"], serde_json::json!([]));
    }
}
