//! Authorization extractors for Axum handlers
//!
//! These extractors read the `AuthContext` installed by `require_auth` and
//! apply a route's role allow-list in a single extraction step.
//!
//! # Usage
//!
//! ```no_run
//! # use docshare_server::api::auth::StaffOnly;
//! # use docshare_server::api::types::ApiError;
//! pub async fn block_document(auth: StaffOnly) -> Result<(), ApiError> {
//!     let actor_id = &auth.ctx.user_id;
//!     Ok(())
//! }
//! ```

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::AuthContext;
use crate::api::types::ApiError;
use crate::data::types::UserRole;

// ============================================================================
// Auth Rejection
// ============================================================================

/// Rejection type for auth extractors
pub enum AuthRejection {
    /// Authorization failed
    Auth(ApiError),
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl axum::response::IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Auth(e) => e.into_response(),
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

fn extract_auth(parts: &Parts) -> Result<AuthContext, AuthRejection> {
    parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .ok_or(AuthRejection::MissingContext)
}

// ============================================================================
// Simple Auth Extractor
// ============================================================================

/// Any authenticated caller
pub struct Auth {
    pub ctx: AuthContext,
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            ctx: extract_auth(parts)?,
        })
    }
}

// ============================================================================
// Role Allow-List Extractors
// ============================================================================

/// Marker trait for a route's role allow-list
pub trait RoleSet: Send + Sync + 'static {
    /// Roles permitted on the route
    const ALLOWED: &'static [UserRole];
}

/// ADMIN or MODERATOR
pub struct Staff;
impl RoleSet for Staff {
    const ALLOWED: &'static [UserRole] = &[UserRole::Admin, UserRole::Moderator];
}

/// ADMIN only
pub struct Admins;
impl RoleSet for Admins {
    const ALLOWED: &'static [UserRole] = &[UserRole::Admin];
}

/// Authenticated caller whose role is in `Roles::ALLOWED`
pub struct RoleGuard<Roles: RoleSet> {
    pub ctx: AuthContext,
    _roles: PhantomData<Roles>,
}

/// Routes open to administrators and moderators
pub type StaffOnly = RoleGuard<Staff>;

/// Routes open to administrators
pub type AdminOnly = RoleGuard<Admins>;

impl<S, Roles> FromRequestParts<S> for RoleGuard<Roles>
where
    S: Send + Sync,
    Roles: RoleSet,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = extract_auth(parts)?;

        if !ctx.has_any_role(Roles::ALLOWED) {
            tracing::debug!(
                user_id = %ctx.user_id,
                role = %ctx.role,
                "Role not permitted on route"
            );
            let allowed: Vec<&str> = Roles::ALLOWED.iter().map(|r| r.as_str()).collect();
            return Err(AuthRejection::Auth(ApiError::forbidden(
                "INSUFFICIENT_ROLE",
                format!("This action requires one of: {}", allowed.join(", ")),
            )));
        }

        Ok(Self {
            ctx,
            _roles: PhantomData,
        })
    }
}
