//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, AuthState, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{admin, auth, documents, health, logs, statistics, users};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::TransactionalService;
use crate::data::files::FileService;

/// Shared services the router is built from
#[derive(Clone)]
pub struct RouterContext {
    pub database: Arc<TransactionalService>,
    pub files: Arc<FileService>,
    pub auth_manager: Arc<AuthManager>,
    pub public_url: String,
    pub allowed_origins: AllowedOrigins,
}

impl RouterContext {
    fn auth_state(&self) -> AuthState {
        AuthState {
            auth_manager: self.auth_manager.clone(),
            database: self.database.clone(),
        }
    }

    /// Guard a route group with bearer authentication
    fn authenticated(&self, routes: Router<()>) -> Router<()> {
        routes.layer(from_fn_with_state(self.auth_state(), require_auth))
    }
}

/// Build the full application router
pub fn build_router(ctx: &RouterContext) -> Router {
    let auth_routes = auth::routes(ctx.auth_manager.clone(), ctx.database.clone());
    let users_routes = ctx.authenticated(users::routes(ctx.database.clone()));
    let documents_routes = ctx.authenticated(documents::routes(
        ctx.database.clone(),
        ctx.files.clone(),
        &ctx.public_url,
    ));
    let admin_routes = ctx.authenticated(admin::routes(ctx.database.clone(), &ctx.public_url));
    let statistics_routes = ctx.authenticated(statistics::routes(ctx.database.clone()));
    let logs_routes = ctx.authenticated(logs::routes(ctx.database.clone()));

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", users_routes)
        .nest("/api/documents", documents_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/statistics", statistics_routes)
        .nest("/api/logs", logs_routes)
        .fallback(middleware::handle_404)
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&ctx.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered; returns CoreApp for cleanup
    pub async fn start(self) -> Result<CoreApp> {
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let addr = SocketAddr::new(
            app.config
                .server
                .host
                .parse()
                .with_context(|| format!("Invalid host: {}", app.config.server.host))?,
            app.config.server.port,
        );

        let router = build_router(&RouterContext {
            database: app.database.clone(),
            files: app.files.clone(),
            auth_manager: app.auth.clone(),
            public_url: app.config.server.public_url.clone(),
            allowed_origins: AllowedOrigins::new(&app.config.cors.origins),
        });

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(address = %addr, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}
