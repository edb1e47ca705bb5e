//! Admin API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::types::{default_limit, default_page, timestamp};
use crate::data::types::{
    DocumentSort, DocumentStatus, ListDocumentsParams, ListUsersParams, MajorWithSubjects,
    SortDirection, SubjectRow, UserRole, UserSort, UserStatus,
};

// ============================================================================
// Users
// ============================================================================

/// Query parameters for the account listing
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: u32,
    /// Matches full name or email, case-insensitive
    pub search: Option<String>,
    #[param(value_type = Option<String>)]
    pub role: Option<UserRole>,
    #[param(value_type = Option<String>)]
    pub status: Option<UserStatus>,
    #[param(value_type = Option<String>)]
    pub sort_by: Option<UserSort>,
    /// Overrides the sort key's default direction
    #[param(value_type = Option<String>)]
    pub sort_order: Option<SortDirection>,
}

impl ListUsersQuery {
    pub fn to_params(&self) -> ListUsersParams {
        let sort = self.sort_by.unwrap_or_default();
        ListUsersParams {
            search: self.search.clone(),
            role: self.role,
            status: self.status,
            sort,
            direction: self.sort_order.unwrap_or_else(|| sort.default_direction()),
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Request body for changing an account's role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetRoleRequest {
    /// USER, MODERATOR or ADMIN
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub message: String,
    pub new_password: String,
}

// ============================================================================
// Documents
// ============================================================================

/// Query parameters for the moderation document listing
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminDocumentsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: u32,
    /// Matches the title, case-insensitive
    pub search: Option<String>,
    #[param(value_type = Option<String>)]
    pub status: Option<DocumentStatus>,
    #[param(value_type = Option<String>)]
    pub sort_by: Option<DocumentSort>,
    #[param(value_type = Option<String>)]
    pub sort_order: Option<SortDirection>,
}

impl AdminDocumentsQuery {
    pub fn to_params(&self) -> ListDocumentsParams {
        ListDocumentsParams {
            search: self.search.clone(),
            search_description: false,
            status: self.status,
            sort: self.sort_by.unwrap_or_default(),
            direction: self.sort_order.unwrap_or_default(),
            page: self.page,
            limit: self.limit,
            ..Default::default()
        }
    }
}

// ============================================================================
// Subjects
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDto {
    pub id: String,
    pub code: String,
    pub name: String,
    pub managing_faculty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubjectRow> for SubjectDto {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            managing_faculty: row.managing_faculty,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 32, message = "Code must be 1-32 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub managing_faculty: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 32, message = "Code must be 1-32 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub managing_faculty: Option<String>,
}

// ============================================================================
// Majors
// ============================================================================

/// Subject reference resolved inside a major
#[derive(Debug, Serialize, ToSchema)]
pub struct MajorSubjectDto {
    pub id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MajorDto {
    pub id: String,
    pub name: String,
    /// Subjects in stored order; ids that no longer resolve are omitted
    pub subjects: Vec<MajorSubjectDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MajorWithSubjects> for MajorDto {
    fn from(row: MajorWithSubjects) -> Self {
        Self {
            id: row.major.id,
            name: row.major.name,
            subjects: row
                .subjects
                .into_iter()
                .map(|s| MajorSubjectDto {
                    id: s.id,
                    code: s.code,
                    name: s.name,
                })
                .collect(),
            created_at: timestamp(row.major.created_at),
            updated_at: timestamp(row.major.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMajorRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    /// Ordered subject ids; not checked for existence
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMajorRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    /// Replaces the stored subject list when present
    pub subjects: Option<Vec<String>>,
}
