//! Authentication module

mod context;
mod extractors;
pub mod jwt;
mod manager;
pub mod middleware;

pub use context::AuthContext;
pub use extractors::{AdminOnly, Admins, Auth, AuthRejection, RoleGuard, RoleSet, Staff, StaffOnly};

pub use jwt::AccessClaims;
pub use manager::AuthManager;
pub use middleware::{AuthError, AuthState, require_auth};
