//! User API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::{ratio, timestamp};
use crate::data::types::{UserRole, UserRow, UserStatus};

/// Public profile of an account; never carries the password hash
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub uploads_count: i64,
    pub downloads_count: i64,
    pub joined_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfileDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            role: row.role,
            status: row.status,
            uploads_count: row.uploads_count,
            downloads_count: row.downloads_count,
            joined_date: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

/// Upload and download totals of one account
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    pub total_uploads: i64,
    pub total_downloads: i64,
    pub avg_downloads_per_doc: f64,
}

impl From<&UserRow> for UserStatsDto {
    fn from(row: &UserRow) -> Self {
        Self {
            total_uploads: row.uploads_count,
            total_downloads: row.downloads_count,
            avg_downloads_per_doc: ratio(row.downloads_count, row.uploads_count),
        }
    }
}

/// Request body for updating the caller's profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: Option<String>,
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Request body for changing the caller's password
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub new_password: String,
}
