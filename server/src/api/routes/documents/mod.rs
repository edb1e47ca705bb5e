//! Document API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::auth::Auth;
use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, MessageResponse, PaginatedResponse};
use crate::core::constants::MULTIPART_OVERHEAD_BYTES;
use crate::data::files::FileService;
use crate::data::types::{
    DocumentPatch, DocumentStatus, DocumentWithUploader, ListDocumentsParams, NewDocument,
};
use crate::data::{TransactionalRepository, TransactionalService};
use crate::domain::counters;
use crate::utils::file::attachment_disposition;
use crate::utils::mime::resolve_upload_type;

use types::{DocumentDto, ListDocumentsQuery, UpdateDocumentRequest, UploadDocumentForm, split_tags};

/// Shared state for Documents API endpoints
#[derive(Clone)]
pub struct DocumentsApiState {
    pub database: Arc<TransactionalService>,
    pub files: Arc<FileService>,
    pub public_url: Arc<str>,
}

/// Build Documents API routes
pub fn routes(
    database: Arc<TransactionalService>,
    files: Arc<FileService>,
    public_url: &str,
) -> Router<()> {
    let upload_limit = usize::try_from(files.max_upload_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let state = DocumentsApiState {
        database,
        files,
        public_url: Arc::from(public_url),
    };

    Router::new()
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/", get(list_documents))
        .route("/my-uploads", get(list_my_uploads))
        .route("/user/{id}/uploads", get(list_user_uploads))
        .route(
            "/{id}",
            get(get_document)
                .patch(update_document)
                .delete(delete_document),
        )
        .route("/{id}/download", get(download_document))
        .with_state(state)
}

fn document_not_found() -> ApiError {
    ApiError::not_found("DOCUMENT_NOT_FOUND", "Document not found")
}

async fn load_document(
    repo: &dyn TransactionalRepository,
    id: &str,
) -> Result<DocumentWithUploader, ApiError> {
    repo.get_document(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(document_not_found)
}

/// Load a document and check that the caller uploaded it
async fn load_owned_document(
    repo: &dyn TransactionalRepository,
    id: &str,
    user_id: &str,
) -> Result<DocumentWithUploader, ApiError> {
    let document = load_document(repo, id).await?;
    if document.document.uploader_id != user_id {
        tracing::debug!(document_id = %id, user_id = %user_id, "Caller does not own document");
        return Err(ApiError::forbidden(
            "FORBIDDEN",
            "You do not have permission to modify this document",
        ));
    }
    Ok(document)
}

// ============================================================================
// Upload
// ============================================================================

struct UploadedFile {
    name: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    faculty: Option<String>,
    subject_id: Option<String>,
}

fn multipart_error(e: MultipartError, max_bytes: u64) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::file_too_large(max_bytes);
    }
    ApiError::bad_request("INVALID_MULTIPART", e.body_text())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

async fn read_file_field(mut field: Field<'_>, max_bytes: u64) -> Result<UploadedFile, ApiError> {
    let name = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| "upload".to_string());
    let content_type = field.content_type().map(str::to_string);

    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if (data.len() + chunk.len()) as u64 > max_bytes {
            return Err(ApiError::file_too_large(max_bytes));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        name,
        content_type,
        data,
    })
}

/// Read every multipart field, enforcing the size limit while streaming
async fn read_upload_form(multipart: &mut Multipart, max_bytes: u64) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            form.file = Some(read_file_field(field, max_bytes).await?);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
        match name.as_str() {
            "title" => form.title = non_empty(value),
            "description" => form.description = non_empty(value),
            "tags" | "tags[]" => form.tags.extend(split_tags([value.as_str()])),
            "faculty" => form.faculty = non_empty(value),
            "subjectId" => form.subject_id = non_empty(value),
            other => tracing::debug!(field = %other, "Ignoring unknown upload field"),
        }
    }

    Ok(form)
}

/// Upload a document
#[utoipa::path(
    post,
    path = "/api/documents/upload",
    tag = "documents",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = DocumentDto),
        (status = 400, description = "Missing file, oversized file or unsupported type")
    ),
    security(("bearer" = []))
)]
pub async fn upload_document(
    State(state): State<DocumentsApiState>,
    auth: Auth,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DocumentDto>), ApiError> {
    let mut multipart =
        multipart.map_err(|e| ApiError::bad_request("INVALID_MULTIPART", e.body_text()))?;
    let max_bytes = state.files.max_upload_bytes();
    let form = read_upload_form(&mut multipart, max_bytes).await?;

    let file = form
        .file
        .ok_or_else(|| ApiError::bad_request("FILE_REQUIRED", "A file is required"))?;
    let title = form
        .title
        .ok_or_else(|| ApiError::bad_request("VALIDATION_ERROR", "Title is required"))?;
    let file_type = resolve_upload_type(file.content_type.as_deref(), &file.name).ok_or_else(
        || ApiError::bad_request("UNSUPPORTED_FILE_TYPE", "This file type is not allowed"),
    )?;

    let stored_name = state
        .files
        .save(&file.name, &file.data)
        .await
        .map_err(ApiError::from_files)?;

    let repo = state.database.repository();
    let created = repo
        .create_document(&NewDocument {
            title,
            description: form.description,
            file_name: stored_name.clone(),
            original_name: file.name,
            file_type: file_type.to_string(),
            file_size: file.data.len() as i64,
            uploader_id: auth.ctx.user_id.clone(),
            tags: form.tags,
            faculty: form.faculty,
            subject_id: form.subject_id,
        })
        .await;

    let row = match created {
        Ok(row) => row,
        Err(e) => {
            state.files.discard(&stored_name).await;
            return Err(ApiError::from_data(e));
        }
    };

    counters::record_upload(repo.as_ref(), &auth.ctx.user_id).await;
    tracing::info!(
        document_id = %row.id,
        user_id = %auth.ctx.user_id,
        size = row.file_size,
        "Document uploaded"
    );

    let document = load_document(repo.as_ref(), &row.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentDto::with_uploader(document, &state.public_url)),
    ))
}

// ============================================================================
// Listings
// ============================================================================

async fn list_page(
    state: &DocumentsApiState,
    params: ListDocumentsParams,
) -> Result<Json<PaginatedResponse<DocumentDto>>, ApiError> {
    let (rows, total) = state
        .database
        .repository()
        .list_documents(&params)
        .await
        .map_err(ApiError::from_data)?;

    let data = rows
        .into_iter()
        .map(|row| DocumentDto::with_uploader(row, &state.public_url))
        .collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page,
        params.limit,
        total,
    )))
}

/// List visible documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    params(ListDocumentsQuery),
    responses(
        (status = 200, description = "Visible documents with pagination metadata"),
        (status = 400, description = "Invalid query")
    ),
    security(("bearer" = []))
)]
pub async fn list_documents(
    State(state): State<DocumentsApiState>,
    _auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListDocumentsQuery>,
) -> Result<Json<PaginatedResponse<DocumentDto>>, ApiError> {
    let mut params = query.to_params();
    params.status = Some(DocumentStatus::Visible);
    list_page(&state, params).await
}

fn owner_params(query: &ListDocumentsQuery, owner_id: &str) -> ListDocumentsParams {
    let mut params = query.to_params();
    params.uploader_id = Some(owner_id.to_string());
    params.search_description = false;
    params
}

/// List the caller's uploads in every status
#[utoipa::path(
    get,
    path = "/api/documents/my-uploads",
    tag = "documents",
    params(ListDocumentsQuery),
    responses((status = 200, description = "Caller's documents with pagination metadata")),
    security(("bearer" = []))
)]
pub async fn list_my_uploads(
    State(state): State<DocumentsApiState>,
    auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListDocumentsQuery>,
) -> Result<Json<PaginatedResponse<DocumentDto>>, ApiError> {
    list_page(&state, owner_params(&query, &auth.ctx.user_id)).await
}

/// List one account's uploads in every status
#[utoipa::path(
    get,
    path = "/api/documents/user/{id}/uploads",
    tag = "documents",
    params(("id" = String, Path, description = "User ID"), ListDocumentsQuery),
    responses((status = 200, description = "User's documents with pagination metadata")),
    security(("bearer" = []))
)]
pub async fn list_user_uploads(
    State(state): State<DocumentsApiState>,
    _auth: Auth,
    IdPath(user_id): IdPath,
    ValidatedQuery(query): ValidatedQuery<ListDocumentsQuery>,
) -> Result<Json<PaginatedResponse<DocumentDto>>, ApiError> {
    list_page(&state, owner_params(&query, &user_id)).await
}

// ============================================================================
// Single document
// ============================================================================

/// Get a document and count the view
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document details", body = DocumentDto),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_document(
    State(state): State<DocumentsApiState>,
    _auth: Auth,
    IdPath(id): IdPath,
) -> Result<Json<DocumentDto>, ApiError> {
    let repo = state.database.repository();
    let document = load_document(repo.as_ref(), &id).await?;

    // Not awaited; the response carries the count before this view
    let database = state.database.clone();
    tokio::spawn(async move {
        if let Err(e) = database.repository().increment_document_views(&id).await {
            tracing::warn!(document_id = %id, error = %e, "Failed to record document view");
        }
    });

    Ok(Json(DocumentDto::with_uploader(document, &state.public_url)))
}

/// Stream the stored file and count the download
#[utoipa::path(
    get,
    path = "/api/documents/{id}/download",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 404, description = "Document or file not found")
    ),
    security(("bearer" = []))
)]
pub async fn download_document(
    State(state): State<DocumentsApiState>,
    _auth: Auth,
    IdPath(id): IdPath,
) -> Result<Response, ApiError> {
    let repo = state.database.repository();
    let document = load_document(repo.as_ref(), &id).await?.document;

    let data = state
        .files
        .read(&document.file_name)
        .await
        .map_err(ApiError::from_files)?;

    if let Err(e) = repo.increment_document_downloads(&id).await {
        tracing::warn!(document_id = %id, error = %e, "Failed to count download");
    }
    counters::record_download(repo.as_ref(), &document.uploader_id).await;

    Ok((
        [
            (header::CONTENT_TYPE, document.file_type),
            (header::CONTENT_LENGTH, data.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&document.original_name),
            ),
        ],
        data,
    )
        .into_response())
}

/// Edit a document the caller uploaded
#[utoipa::path(
    patch,
    path = "/api/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = DocumentDto),
        (status = 403, description = "Caller is not the uploader"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_document(
    State(state): State<DocumentsApiState>,
    auth: Auth,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateDocumentRequest>,
) -> Result<Json<DocumentDto>, ApiError> {
    let repo = state.database.repository();
    load_owned_document(repo.as_ref(), &id, &auth.ctx.user_id).await?;

    let patch = DocumentPatch {
        title: body.title.map(|title| title.trim().to_string()),
        description: body.description,
        tags: body
            .tags
            .map(|tags| split_tags(tags.iter().map(String::as_str))),
        faculty: body.faculty,
        subject_id: body.subject_id,
    };

    repo.update_document(&id, &patch)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(document_not_found)?;

    let document = load_document(repo.as_ref(), &id).await?;
    Ok(Json(DocumentDto::with_uploader(document, &state.public_url)))
}

/// Remove a document the caller uploaded
///
/// The stored binary is left in place.
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document removed", body = MessageResponse),
        (status = 403, description = "Caller is not the uploader"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_document(
    State(state): State<DocumentsApiState>,
    auth: Auth,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = state.database.repository();
    load_owned_document(repo.as_ref(), &id, &auth.ctx.user_id).await?;

    let removed = repo
        .delete_document(&id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(document_not_found)?;

    counters::record_removal(repo.as_ref(), &removed.uploader_id).await;
    tracing::info!(document_id = %id, user_id = %auth.ctx.user_id, "Document removed");

    Ok(Json(MessageResponse::new("Document deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode, header};
    use serde_json::json;

    use crate::api::test_support::{MultipartBody, TestApp};
    use crate::data::types::UserRole;

    #[tokio::test]
    async fn test_upload_and_fetch() {
        let app = TestApp::new().await;
        let (user_id, token) = app.user("a@example.com", "Alice").await;

        let body = MultipartBody::new()
            .text("title", "Linear Algebra Notes")
            .text("description", "Week 1")
            .text("tags", "math, algebra")
            .text("tags", "exam")
            .text("faculty", "Science")
            .file("file", "notes.pdf", Some("application/pdf"), b"%PDF-1.4 test");
        let (status, document) = app.upload(&token, body).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(document["status"], "VISIBLE");
        assert_eq!(document["fileName"], "notes.pdf");
        assert_eq!(document["fileType"], "application/pdf");
        assert_eq!(document["fileSize"], 13);
        assert_eq!(document["uploaderId"], user_id.as_str());
        assert_eq!(document["uploader"]["fullName"], "Alice");
        assert_eq!(document["tags"], json!(["math", "algebra", "exam"]));
        let id = document["id"].as_str().unwrap();
        assert_eq!(
            document["fileUrl"],
            format!("http://localhost:8000/api/documents/{id}/download")
        );

        let (_, profile) = app
            .request(Method::GET, "/api/users/me/profile", Some(&token), None)
            .await;
        assert_eq!(profile["uploadsCount"], 1);
        assert_eq!(app.platform_stats().await.total_uploads, 1);

        let (status, fetched) = app
            .request(Method::GET, &format!("/api/documents/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Linear Algebra Notes");
        assert_eq!(fetched["viewCount"], 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_persists_nothing() {
        let app = TestApp::with_max_upload(16).await;
        let (_, token) = app.user("a@example.com", "Alice").await;

        let body = MultipartBody::new()
            .text("title", "Too big")
            .file("file", "big.txt", Some("text/plain"), &[b'x'; 64]);
        let (status, error) = app.upload(&token, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "FILE_TOO_LARGE");
        let (_, list) = app
            .request(Method::GET, "/api/documents/my-uploads", Some(&token), None)
            .await;
        assert_eq!(list["pagination"]["total"], 0);
        assert_eq!(app.platform_stats().await.total_uploads, 0);
        assert_eq!(app.stored_file_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_input() {
        let app = TestApp::new().await;
        let (_, token) = app.user("a@example.com", "Alice").await;

        let body = MultipartBody::new()
            .text("title", "Script")
            .file("file", "run.exe", Some("application/x-msdownload"), b"MZ");
        let (status, error) = app.upload(&token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "UNSUPPORTED_FILE_TYPE");

        let body = MultipartBody::new().text("title", "No file");
        let (status, error) = app.upload(&token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "FILE_REQUIRED");

        let body = MultipartBody::new().file("file", "a.txt", Some("text/plain"), b"hi");
        let (status, _) = app.upload(&token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_type_guessed_from_name() {
        let app = TestApp::new().await;
        let (_, token) = app.user("a@example.com", "Alice").await;

        let body = MultipartBody::new()
            .text("title", "Readme")
            .file("file", "README.md", None, b"# Title");
        let (status, document) = app.upload(&token, body).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(document["fileType"], "text/markdown");
    }

    #[tokio::test]
    async fn test_download_counts_and_headers() {
        let app = TestApp::new().await;
        let (owner_id, owner_token) = app.user("a@example.com", "Alice").await;
        let (_, reader_token) = app.user("b@example.com", "Bob").await;
        let document = app.upload_text(&owner_token, "Notes").await;
        let id = document["id"].as_str().unwrap();

        for _ in 0..3 {
            let response = app
                .get_raw(&format!("/api/documents/{id}/download"), &reader_token)
                .await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                "attachment; filename=\"notes.txt\""
            );
            assert_eq!(response.headers()[header::CONTENT_LENGTH], "5");
        }

        let (_, fetched) = app
            .request(Method::GET, &format!("/api/documents/{id}"), Some(&reader_token), None)
            .await;
        assert_eq!(fetched["downloadCount"], 3);

        let owner = app
            .database
            .repository()
            .get_user(&owner_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.downloads_count, 3);
        assert!(app.platform_stats().await.total_downloads >= 3);
    }

    #[tokio::test]
    async fn test_missing_document_and_malformed_id() {
        let app = TestApp::new().await;
        let (_, token) = app.user("a@example.com", "Alice").await;

        let (status, body) = app
            .request(Method::GET, "/api/documents/doesnotexist", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "DOCUMENT_NOT_FOUND");

        let (status, body) = app
            .request(Method::GET, "/api/documents/bad%20id!", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_only_owner_may_edit_or_remove() {
        let app = TestApp::new().await;
        let (_, owner_token) = app.user("a@example.com", "Alice").await;
        let (_, other_token) = app.user("b@example.com", "Bob").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        let document = app.upload_text(&owner_token, "Notes").await;
        let path = format!("/api/documents/{}", document["id"].as_str().unwrap());

        for token in [&other_token, &admin_token] {
            let (status, body) = app
                .request(Method::PATCH, &path, Some(token), Some(json!({"title": "Mine"})))
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["code"], "FORBIDDEN");

            let (status, _) = app.request(Method::DELETE, &path, Some(token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }

        let (status, updated) = app
            .request(
                Method::PATCH,
                &path,
                Some(&owner_token),
                Some(json!({"title": "Renamed", "tags": ["a", "b"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Renamed");
        assert_eq!(updated["tags"], json!(["a", "b"]));
        assert_eq!(updated["fileName"], "notes.txt");

        let (status, _) = app
            .request(Method::DELETE, &path, Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.platform_stats().await.total_uploads, 0);

        let (status, _) = app.request(Method::GET, &path, Some(&owner_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let app = TestApp::new().await;
        let (_, token) = app.user("a@example.com", "Alice").await;
        for title in ["Calculus", "Chemistry", "Algebra basics"] {
            app.upload_text(&token, title).await;
        }
        let body = MultipartBody::new()
            .text("title", "Physics slides")
            .text("subjectId", "phy101")
            .file("file", "slides.pdf", Some("application/pdf"), b"%PDF");
        app.upload(&token, body).await;

        let (status, page) = app
            .request(Method::GET, "/api/documents?page=2&limit=3", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            page["pagination"],
            json!({"total": 4, "page": 2, "limit": 3, "totalPages": 2})
        );
        assert_eq!(page["data"].as_array().unwrap().len(), 1);

        let (_, found) = app
            .request(Method::GET, "/api/documents?search=ALGEBRA", Some(&token), None)
            .await;
        assert_eq!(found["pagination"]["total"], 1);
        assert_eq!(found["data"][0]["title"], "Algebra basics");

        let (_, pdfs) = app
            .request(Method::GET, "/api/documents?fileType=pdf", Some(&token), None)
            .await;
        assert_eq!(pdfs["pagination"]["total"], 1);

        let (_, by_subject) = app
            .request(
                Method::GET,
                "/api/documents?subjects%5B%5D=phy101&subjects%5B%5D=none",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(by_subject["data"][0]["title"], "Physics slides");

        let (_, sorted) = app
            .request(
                Method::GET,
                "/api/documents?sortBy=title&sortOrder=asc",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(sorted["data"][0]["title"], "Algebra basics");

        let (status, body) = app
            .request(Method::GET, "/api/documents?limit=500", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_page_far_past_the_end_is_empty() {
        let app = TestApp::new().await;
        let (_, token) = app.user("a@example.com", "Alice").await;
        app.upload_text(&token, "Calculus").await;

        let (status, page) = app
            .request(
                Method::GET,
                "/api/documents?page=50000000&limit=100",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"], json!([]));
        assert_eq!(page["pagination"]["total"], 1);
        assert_eq!(page["pagination"]["page"], 50_000_000);
    }

    #[tokio::test]
    async fn test_search_ignores_vietnamese_case() {
        let app = TestApp::new().await;
        let (_, token) = app.user("a@example.com", "Alice").await;
        app.upload_text(&token, "Toán Cao Cấp").await;
        app.upload_text(&token, "Vật Lý").await;

        let (status, found) = app
            .request(Method::GET, "/api/documents?search=TO%C3%81N", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["pagination"]["total"], 1);
        assert_eq!(found["data"][0]["title"], "Toán Cao Cấp");
    }

    #[tokio::test]
    async fn test_blocked_document_scenario() {
        let app = TestApp::new().await;
        let (user_id, token) = app.user("a@example.com", "Alice").await;
        let (_, other_token) = app.user("b@example.com", "Bob").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;

        let document = app.upload_text(&token, "Notes").await;
        let id = document["id"].as_str().unwrap();

        let (_, listed) = app
            .request(Method::GET, "/api/documents", Some(&other_token), None)
            .await;
        assert_eq!(listed["data"][0]["id"], id);
        assert_eq!(listed["data"][0]["status"], "VISIBLE");

        let (status, _) = app
            .request(
                Method::POST,
                &format!("/api/admin/documents/{id}/block"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, listed) = app
            .request(Method::GET, "/api/documents", Some(&other_token), None)
            .await;
        assert_eq!(listed["pagination"]["total"], 0);

        let (status, fetched) = app
            .request(Method::GET, &format!("/api/documents/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["status"], "BLOCKED");

        let (_, mine) = app
            .request(
                Method::GET,
                &format!("/api/documents/user/{user_id}/uploads"),
                Some(&other_token),
                None,
            )
            .await;
        assert_eq!(mine["pagination"]["total"], 1);
        assert_eq!(mine["data"][0]["status"], "BLOCKED");
    }

    #[tokio::test]
    async fn test_deleted_uploader_resolves_to_null() {
        let app = TestApp::new().await;
        let (user_id, token) = app.user("a@example.com", "Alice").await;
        let (_, admin_token) = app.staff("admin@example.com", UserRole::Admin).await;
        let document = app.upload_text(&token, "Notes").await;
        let id = document["id"].as_str().unwrap();

        let (status, _) = app
            .request(
                Method::DELETE,
                &format!("/api/admin/users/{user_id}"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, fetched) = app
            .request(Method::GET, &format!("/api/documents/{id}"), Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(fetched["uploader"].is_null());
        assert_eq!(fetched["uploaderId"], user_id.as_str());
    }
}
