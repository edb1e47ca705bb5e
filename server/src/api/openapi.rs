//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::routes::{admin, auth, documents, health, logs, statistics, users};
use crate::api::types::{MessageResponse, PaginationMeta};
use crate::data::types::{DocumentStatus, UserRole, UserStatus};

/// Registers the `bearer` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DocShare API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Document sharing backend"
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Profiles and personal statistics"),
        (name = "documents", description = "Document upload, listing and download"),
        (name = "admin", description = "Moderation and taxonomy management"),
        (name = "statistics", description = "Platform statistics"),
        (name = "logs", description = "Audit trail")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Users
        users::get_my_profile,
        users::update_my_profile,
        users::change_password,
        users::get_profile,
        users::get_my_stats,
        users::get_user_stats,
        // Documents
        documents::upload_document,
        documents::list_documents,
        documents::list_my_uploads,
        documents::list_user_uploads,
        documents::get_document,
        documents::download_document,
        documents::update_document,
        documents::delete_document,
        // Admin
        admin::list_users,
        admin::block_user,
        admin::unblock_user,
        admin::reset_password,
        admin::delete_user,
        admin::set_role,
        admin::list_documents,
        admin::block_document,
        admin::unblock_document,
        admin::delete_document,
        admin::list_subjects,
        admin::create_subject,
        admin::update_subject,
        admin::delete_subject,
        admin::list_majors,
        admin::create_major,
        admin::update_major,
        admin::delete_major,
        // Statistics
        statistics::platform_stats,
        statistics::uploads_over_time,
        // Logs
        logs::list_logs,
    ),
    components(schemas(
        // API types
        PaginationMeta,
        MessageResponse,
        UserRole,
        UserStatus,
        DocumentStatus,
        // Health
        health::HealthResponse,
        // Auth
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::LoginUserDto,
        auth::LoginResponse,
        auth::MeResponse,
        // Users
        users::types::UserProfileDto,
        users::types::UserStatsDto,
        users::types::UpdateProfileRequest,
        users::types::ChangePasswordRequest,
        // Documents
        documents::types::DocumentDto,
        documents::types::UploaderDto,
        documents::types::UpdateDocumentRequest,
        documents::types::UploadDocumentForm,
        // Admin
        admin::types::SetRoleRequest,
        admin::types::ResetPasswordResponse,
        admin::types::SubjectDto,
        admin::types::CreateSubjectRequest,
        admin::types::UpdateSubjectRequest,
        admin::types::MajorDto,
        admin::types::MajorSubjectDto,
        admin::types::CreateMajorRequest,
        admin::types::UpdateMajorRequest,
        // Statistics
        statistics::PlatformStatsDto,
        statistics::DailyUploadsDto,
        // Logs
        logs::AuditLogDto,
        logs::LogActorDto,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>DocShare API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
