//! Document API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::types::{default_limit, default_page, timestamp};
use crate::data::types::{
    DocumentRow, DocumentSort, DocumentStatus, DocumentWithUploader, ListDocumentsParams,
    SortDirection, UserSummary,
};
use crate::utils::mime::file_type_filter;

/// Uploader summary embedded in a document
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploaderDto {
    pub id: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    /// Only present in moderation listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UploaderDto {
    pub fn public(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            full_name: summary.full_name,
            avatar_url: summary.avatar_url,
            email: None,
        }
    }

    pub fn with_email(summary: UserSummary) -> Self {
        Self {
            email: Some(summary.email.clone()),
            ..Self::public(summary)
        }
    }
}

/// Document DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploader_id: String,
    /// `null` when the uploader no longer exists
    pub uploader: Option<UploaderDto>,
    pub status: DocumentStatus,
    pub tags: Vec<String>,
    pub faculty: Option<String>,
    pub subject_id: Option<String>,
    pub download_count: i64,
    pub view_count: i64,
    pub upload_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentDto {
    /// Public download link for a document
    pub fn file_url(public_url: &str, id: &str) -> String {
        format!(
            "{}/api/documents/{}/download",
            public_url.trim_end_matches('/'),
            id
        )
    }

    pub fn new(row: DocumentRow, uploader: Option<UploaderDto>, public_url: &str) -> Self {
        Self {
            file_url: Self::file_url(public_url, &row.id),
            id: row.id,
            title: row.title,
            description: row.description,
            file_name: row.original_name,
            file_type: row.file_type,
            file_size: row.file_size,
            uploader_id: row.uploader_id,
            uploader,
            status: row.status,
            tags: row.tags,
            faculty: row.faculty,
            subject_id: row.subject_id,
            download_count: row.download_count,
            view_count: row.view_count,
            upload_date: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }

    /// Document with a public uploader summary (`null` when the owner is gone)
    pub fn with_uploader(doc: DocumentWithUploader, public_url: &str) -> Self {
        Self::new(doc.document, doc.uploader.map(UploaderDto::public), public_url)
    }
}

/// Query parameters for document listings
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListDocumentsQuery {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,
    /// Items per page
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: u32,
    /// Case-insensitive substring search
    pub search: Option<String>,
    pub faculty: Option<String>,
    /// Single subject id
    pub subject: Option<String>,
    /// Repeated subject ids
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Repeated subject ids, bracket form
    #[serde(default, rename = "subjects[]")]
    pub subjects_bracketed: Vec<String>,
    /// Exact MIME type or short alias such as `pdf`
    pub file_type: Option<String>,
    #[param(value_type = Option<String>)]
    pub sort_by: Option<DocumentSort>,
    #[param(value_type = Option<String>)]
    pub sort_order: Option<SortDirection>,
}

impl ListDocumentsQuery {
    /// Every requested subject id, deduplicated in request order
    pub fn subject_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let requested = self
            .subject
            .iter()
            .chain(&self.subjects)
            .chain(&self.subjects_bracketed);
        for id in requested {
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }

    /// Repository parameters for this query
    pub fn to_params(&self) -> ListDocumentsParams {
        ListDocumentsParams {
            search: self.search.clone(),
            search_description: true,
            faculty: self.faculty.clone(),
            subject_ids: self.subject_ids(),
            file_types: self
                .file_type
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(file_type_filter)
                .unwrap_or_default(),
            status: None,
            uploader_id: None,
            sort: self.sort_by.unwrap_or_default(),
            direction: self.sort_order.unwrap_or_default(),
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Request body for editing a document
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub faculty: Option<String>,
    pub subject_id: Option<String>,
}

/// Multipart fields accepted by the upload endpoint
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub title: String,
    pub description: Option<String>,
    /// Repeatable; each value may be comma separated
    pub tags: Option<Vec<String>>,
    pub faculty: Option<String>,
    pub subject_id: Option<String>,
}

/// Split tag values on commas, trimming and dropping empties
pub fn split_tags<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
