//! Shared API types
//!
//! Common types used across all API endpoints: the error envelope, pagination
//! defaults and the paginated response wrapper.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::constants::{DEFAULT_LOG_PAGE_LIMIT, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::data::DataError;
use crate::data::files::FileServiceError;
use crate::domain::AccountError;

/// Default page number
pub const DEFAULT_PAGE: u32 = 1;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    Conflict { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        match e {
            DataError::Conflict(detail) => {
                tracing::debug!(detail = %detail, "Unique constraint violated");
                Self::conflict("CONFLICT", "Resource already exists")
            }
            e if e.is_transient() => {
                tracing::warn!(error = %e, "Database temporarily unavailable");
                Self::service_unavailable("Database temporarily unavailable")
            }
            e => {
                tracing::error!(error = %e, "Data error");
                Self::internal("Database operation failed")
            }
        }
    }

    pub fn from_files(e: FileServiceError) -> Self {
        match e {
            FileServiceError::NotFound { name } => {
                tracing::warn!(name = %name, "Stored file missing");
                Self::not_found("FILE_NOT_FOUND", "File not found")
            }
            FileServiceError::TooLarge { max, .. } => Self::file_too_large(max),
            FileServiceError::Storage(e) => {
                tracing::error!(error = %e, "File storage error");
                Self::internal("File storage operation failed")
            }
        }
    }

    pub fn from_account(e: AccountError) -> Self {
        match e {
            AccountError::EmailExists => Self::conflict("EMAIL_EXISTS", "Email already exists"),
            AccountError::InvalidCredentials => {
                Self::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
            }
            AccountError::Blocked => Self::unauthorized("USER_BLOCKED", "Account is blocked"),
            AccountError::WrongPassword => {
                Self::bad_request("INVALID_PASSWORD", "Current password is incorrect")
            }
            AccountError::NotFound => Self::not_found("USER_NOT_FOUND", "User not found"),
            AccountError::Hashing(detail) => {
                tracing::error!(error = %detail, "Password hashing failed");
                Self::internal("Password processing failed")
            }
            AccountError::Data(e) => Self::from_data(e),
        }
    }

    pub fn file_too_large(max: u64) -> Self {
        Self::bad_request(
            "FILE_TOO_LARGE",
            format!("File exceeds the maximum size of {} bytes", max),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Forbidden { code, message } => {
                (StatusCode::FORBIDDEN, "forbidden", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Body returned by mutations that have nothing else to report
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

pub fn default_log_limit() -> u32 {
    DEFAULT_LOG_PAGE_LIMIT
}

/// Pagination metadata in response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit.clamp(1, MAX_PAGE_LIMIT))),
        }
    }
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Convert a stored Unix timestamp for the wire (RFC 3339 UTC)
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator` rounded to two decimals, 0 when the denominator is not positive
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        0.0
    } else {
        round2(numerator as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, limit, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (95, 20, 5)]
        {
            let meta = PaginationMeta::new(1, limit, total);
            assert_eq!(meta.total_pages, expected, "total={total} limit={limit}");
        }
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let response = PaginatedResponse::new(vec![1, 2], 2, 2, 5);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "data": [1, 2],
                "pagination": {"total": 5, "page": 2, "limit": 2, "totalPages": 3}
            })
        );
    }

    #[test]
    fn test_ratio_rounding() {
        assert_eq!(ratio(10, 3), 3.33);
        assert_eq!(ratio(2, 3), 0.67);
        assert_eq!(ratio(5, 0), 0.0);
        assert_eq!(ratio(5, -1), 0.0);
    }

    #[test]
    fn test_timestamp_serializes_rfc3339() {
        let value = serde_json::to_value(timestamp(0)).unwrap();
        assert_eq!(value, "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let response = ApiError::from_data(DataError::Conflict("users.email".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
