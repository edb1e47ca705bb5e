//! Router harness for route tests
//!
//! Builds the real router over an in-memory database and a temporary upload
//! directory, and drives it with `tower::ServiceExt::oneshot`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use super::auth::AuthManager;
use super::middleware::AllowedOrigins;
use super::server::{RouterContext, build_router};
use crate::core::config::AuthConfig;
use crate::core::constants::DEFAULT_MAX_UPLOAD_BYTES;
use crate::data::TransactionalService;
use crate::data::files::{FileService, FilesystemStorage};
use crate::data::types::{PlatformStatsRow, UserRole};
use crate::domain::accounts;

const BOUNDARY: &str = "docshare-test-boundary";

pub struct TestApp {
    router: Router,
    pub database: Arc<TransactionalService>,
    uploads: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Password used by every account the harness creates
    pub const PASSWORD: &'static str = "secret123";

    pub async fn new() -> Self {
        Self::with_max_upload(DEFAULT_MAX_UPLOAD_BYTES).await
    }

    pub async fn with_max_upload(max_upload_bytes: u64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads).unwrap();

        let database = Arc::new(TransactionalService::in_memory().await);
        let files = Arc::new(FileService::with_storage(
            Arc::new(FilesystemStorage::new(uploads.clone())),
            max_upload_bytes,
        ));
        let auth_manager = Arc::new(AuthManager::init(&AuthConfig {
            jwt_secret: Some("test-secret-0123456789".to_string()),
            token_ttl_hours: 1,
        }));

        let router = build_router(&RouterContext {
            database: database.clone(),
            files,
            auth_manager,
            public_url: "http://localhost:8000".to_string(),
            allowed_origins: AllowedOrigins::new(&["http://localhost:3000".to_string()]),
        });

        Self {
            router,
            database,
            uploads,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Send a JSON request and decode the JSON response
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        Self::json_body(self.send(request).await).await
    }

    /// Authenticated GET returning the raw response
    pub async fn get_raw(&self, uri: &str, token: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart body to the upload endpoint
    pub async fn upload(&self, token: &str, body: MultipartBody) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/documents/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, MultipartBody::content_type())
            .body(Body::from(body.finish()))
            .unwrap();
        Self::json_body(self.send(request).await).await
    }

    /// Register through the API and return the new user id
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"email": email, "password": password, "fullName": full_name})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": email, "password": Self::PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Register a USER account and log in; returns (id, token)
    pub async fn user(&self, email: &str, full_name: &str) -> (String, String) {
        let id = self.register(email, Self::PASSWORD, full_name).await;
        (id, self.login(email).await)
    }

    /// Create an account with the given role and log in; returns (id, token)
    pub async fn staff(&self, email: &str, role: UserRole) -> (String, String) {
        let repo = self.database.repository();
        let user = accounts::register(repo.as_ref(), email, Self::PASSWORD, "Staff", role)
            .await
            .unwrap();
        (user.id, self.login(email).await)
    }

    /// Upload a small text file and return the created document
    pub async fn upload_text(&self, token: &str, title: &str) -> Value {
        let body = MultipartBody::new()
            .text("title", title)
            .file("file", "notes.txt", Some("text/plain"), b"hello");
        let (status, document) = self.upload(token, body).await;
        assert_eq!(status, StatusCode::CREATED, "upload failed: {document}");
        document
    }

    pub async fn platform_stats(&self) -> PlatformStatsRow {
        self.database
            .repository()
            .get_platform_stats()
            .await
            .unwrap()
    }

    /// Number of binaries in the upload directory
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.uploads).unwrap().count()
    }
}

/// Hand-built `multipart/form-data` body
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(
        mut self,
        name: &str,
        file_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Self {
        let mut head = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
        );
        if let Some(content_type) = content_type {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        head.push_str("\r\n");
        self.bytes.extend_from_slice(head.as_bytes());
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}
