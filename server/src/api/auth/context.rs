//! Request-scoped identity

use crate::data::types::UserRole;

/// Identity of the authenticated caller
///
/// Built from the stored user record on every request, so role changes
/// apply without a new login.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthContext {
    /// True when the caller's role is in the allow-list
    ///
    /// There is no implied hierarchy; callers enumerate every permitted role.
    pub fn has_any_role(&self, allowed: &[UserRole]) -> bool {
        allowed.contains(&self.role)
    }
}
