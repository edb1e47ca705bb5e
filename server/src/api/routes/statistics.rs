//! Platform statistics endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::auth::StaffOnly;
use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, ratio};
use crate::core::constants::{DEFAULT_UPLOAD_HISTORY_DAYS, MAX_UPLOAD_HISTORY_DAYS};
use crate::data::TransactionalService;
use crate::data::types::{DailyUploadRow, PlatformStatsRow};

#[derive(Clone)]
pub struct StatisticsApiState {
    pub database: Arc<TransactionalService>,
}

pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    Router::new()
        .route("/platform", get(platform_stats))
        .route("/uploads-over-time", get(uploads_over_time))
        .with_state(StatisticsApiState { database })
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsDto {
    pub total_uploads: i64,
    pub total_downloads: i64,
    pub active_users: i64,
    /// Downloads per upload, two decimals
    pub avg_dl_per_doc: f64,
}

impl From<PlatformStatsRow> for PlatformStatsDto {
    fn from(row: PlatformStatsRow) -> Self {
        Self {
            avg_dl_per_doc: ratio(row.total_downloads, row.total_uploads),
            total_uploads: row.total_uploads,
            total_downloads: row.total_downloads,
            active_users: row.active_users,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyUploadsDto {
    /// UTC day, `YYYY-MM-DD`
    pub date: String,
    pub count: i64,
}

impl From<DailyUploadRow> for DailyUploadsDto {
    fn from(row: DailyUploadRow) -> Self {
        Self {
            date: row.date,
            count: row.count,
        }
    }
}

fn default_days() -> u32 {
    DEFAULT_UPLOAD_HISTORY_DAYS
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadsOverTimeQuery {
    /// Window size in days, today included
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = MAX_UPLOAD_HISTORY_DAYS, message = "Days must be between 1 and 365"))]
    pub days: u32,
}

/// Unix seconds at UTC midnight starting a window of `days` days ending today
fn window_start(days: u32) -> i64 {
    let today = Utc::now().date_naive();
    let first = today - Duration::days(i64::from(days.saturating_sub(1)));
    first
        .and_hms_opt(0, 0, 0)
        .map(|start| start.and_utc().timestamp())
        .unwrap_or(0)
}

/// Platform counters
#[utoipa::path(
    get,
    path = "/api/statistics/platform",
    tag = "statistics",
    responses(
        (status = 200, description = "Platform counters", body = PlatformStatsDto),
        (status = 403, description = "Role not permitted")
    ),
    security(("bearer" = []))
)]
pub async fn platform_stats(
    State(state): State<StatisticsApiState>,
    _auth: StaffOnly,
) -> Result<Json<PlatformStatsDto>, ApiError> {
    let stats = state
        .database
        .repository()
        .get_platform_stats()
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(PlatformStatsDto::from(stats)))
}

/// Uploads per UTC day; days without uploads are omitted
#[utoipa::path(
    get,
    path = "/api/statistics/uploads-over-time",
    tag = "statistics",
    params(UploadsOverTimeQuery),
    responses(
        (status = 200, description = "Daily upload counts, oldest first", body = Vec<DailyUploadsDto>),
        (status = 400, description = "Days out of range")
    ),
    security(("bearer" = []))
)]
pub async fn uploads_over_time(
    State(state): State<StatisticsApiState>,
    _auth: StaffOnly,
    ValidatedQuery(query): ValidatedQuery<UploadsOverTimeQuery>,
) -> Result<Json<Vec<DailyUploadsDto>>, ApiError> {
    let rows = state
        .database
        .repository()
        .daily_uploads_since(window_start(query.days))
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(rows.into_iter().map(DailyUploadsDto::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::api::test_support::TestApp;
    use crate::data::types::UserRole;

    #[test]
    fn test_window_start_is_midnight() {
        let start = window_start(1);
        assert_eq!(start % 86_400, 0);
        assert!(Utc::now().timestamp() - start < 86_400);
        assert_eq!(window_start(1) - window_start(3), 2 * 86_400);
    }

    #[tokio::test]
    async fn test_platform_stats_average() {
        let app = TestApp::new().await;
        let (_, token) = app.user("u@example.com", "U").await;
        let (_, staff_token) = app.staff("mod@example.com", UserRole::Moderator).await;

        let (status, empty) = app
            .request(Method::GET, "/api/statistics/platform", Some(&staff_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            empty,
            json!({"totalUploads": 0, "totalDownloads": 0, "activeUsers": 2, "avgDlPerDoc": 0.0})
        );

        let first = app.upload_text(&token, "One").await;
        app.upload_text(&token, "Two").await;
        app.upload_text(&token, "Three").await;
        app.get_raw(
            &format!("/api/documents/{}/download", first["id"].as_str().unwrap()),
            &token,
        )
        .await;

        let (_, stats) = app
            .request(Method::GET, "/api/statistics/platform", Some(&staff_token), None)
            .await;
        assert_eq!(stats["totalUploads"], 3);
        assert_eq!(stats["totalDownloads"], 1);
        assert_eq!(stats["avgDlPerDoc"], 0.33);
    }

    #[tokio::test]
    async fn test_uploads_over_time() {
        let app = TestApp::new().await;
        let (_, token) = app.user("u@example.com", "U").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        app.upload_text(&token, "One").await;
        app.upload_text(&token, "Two").await;

        let (status, days) = app
            .request(
                Method::GET,
                "/api/statistics/uploads-over-time?days=1",
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let today = Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(days, json!([{"date": today, "count": 2}]));

        for bad in ["0", "366"] {
            let (status, body) = app
                .request(
                    Method::GET,
                    &format!("/api/statistics/uploads-over-time?days={bad}"),
                    Some(&admin_token),
                    None,
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_statistics_require_staff() {
        let app = TestApp::new().await;
        let (_, token) = app.user("u@example.com", "U").await;

        let (status, body) = app
            .request(Method::GET, "/api/statistics/platform", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INSUFFICIENT_ROLE");

        let (status, _) = app
            .request(Method::GET, "/api/statistics/platform", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
