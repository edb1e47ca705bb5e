//! Row and parameter types for the transactional store

use super::enums::{
    DocumentSort, DocumentStatus, SortDirection, UserRole, UserSort, UserStatus,
};

// ============================================================================
// User types
// ============================================================================

/// User row from database
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub uploads_count: i64,
    pub downloads_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserRow {
    pub fn is_blocked(&self) -> bool {
        self.status == UserStatus::Blocked
    }
}

/// Fields for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Self-service profile edit; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserProfilePatch {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Admin user listing parameters
#[derive(Debug, Clone, Default)]
pub struct ListUsersParams {
    /// Case-insensitive substring over full name or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub sort: UserSort,
    pub direction: SortDirection,
    pub page: u32,
    pub limit: u32,
}

/// Outcome of a conditional status write
#[derive(Debug, Clone)]
pub struct StatusChange<T> {
    pub row: T,
    /// False when the row already had the requested status
    pub changed: bool,
}

/// Compact user projection embedded in documents and audit logs
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

// ============================================================================
// Document types
// ============================================================================

/// Document row from database, tags in insertion order
#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Generated storage name (also the download filename)
    pub file_name: String,
    /// Client-supplied filename at upload time
    pub original_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploader_id: String,
    pub status: DocumentStatus,
    pub tags: Vec<String>,
    pub faculty: Option<String>,
    pub subject_id: Option<String>,
    pub download_count: i64,
    pub view_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Document with its uploader, `None` when the uploader no longer exists
#[derive(Debug, Clone)]
pub struct DocumentWithUploader {
    pub document: DocumentRow,
    pub uploader: Option<UserSummary>,
}

/// Fields for a new document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub original_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploader_id: String,
    pub tags: Vec<String>,
    pub faculty: Option<String>,
    pub subject_id: Option<String>,
}

/// Owner edit of document metadata; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub faculty: Option<String>,
    pub subject_id: Option<String>,
}

/// Document listing parameters shared by the public, owner and admin views
#[derive(Debug, Clone, Default)]
pub struct ListDocumentsParams {
    /// Case-insensitive substring; matched against the title and, when
    /// `search_description` is set, the description
    pub search: Option<String>,
    pub search_description: bool,
    pub faculty: Option<String>,
    /// Matches any of the given subject ids
    pub subject_ids: Vec<String>,
    /// Exact mime types (an alias may expand to several)
    pub file_types: Vec<String>,
    pub status: Option<DocumentStatus>,
    pub uploader_id: Option<String>,
    pub sort: DocumentSort,
    pub direction: SortDirection,
    pub page: u32,
    pub limit: u32,
}

// ============================================================================
// Taxonomy types
// ============================================================================

/// Subject row from database
#[derive(Debug, Clone)]
pub struct SubjectRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub managing_faculty: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for a new subject
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub code: String,
    pub name: String,
    pub managing_faculty: Option<String>,
}

/// Subject edit; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub managing_faculty: Option<String>,
}

/// Major row from database, subject ids in stored order
#[derive(Debug, Clone)]
pub struct MajorRow {
    pub id: String,
    pub name: String,
    pub subject_ids: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Major with referenced subjects resolved; dangling references are dropped
#[derive(Debug, Clone)]
pub struct MajorWithSubjects {
    pub major: MajorRow,
    pub subjects: Vec<SubjectRow>,
}

/// Major edit; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct MajorPatch {
    pub name: Option<String>,
    pub subject_ids: Option<Vec<String>>,
}

// ============================================================================
// Statistics types
// ============================================================================

/// Platform counters (all zero before the first increment)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformStatsRow {
    pub total_uploads: i64,
    pub total_downloads: i64,
    pub active_users: i64,
}

/// Signed increments applied atomically to the platform counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    pub uploads: i64,
    pub downloads: i64,
    pub active_users: i64,
}

impl StatsDelta {
    pub fn uploads(n: i64) -> Self {
        Self {
            uploads: n,
            ..Default::default()
        }
    }

    pub fn downloads(n: i64) -> Self {
        Self {
            downloads: n,
            ..Default::default()
        }
    }

    pub fn active_users(n: i64) -> Self {
        Self {
            active_users: n,
            ..Default::default()
        }
    }
}

/// Upload count for one UTC calendar day (`YYYY-MM-DD`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyUploadRow {
    pub date: String,
    pub count: i64,
}

// ============================================================================
// Audit log types
// ============================================================================

/// Audit log row joined with the acting user
#[derive(Debug, Clone)]
pub struct AuditLogRow {
    pub id: String,
    pub actor_id: String,
    pub action: String,
    pub target_id: Option<String>,
    pub created_at: i64,
    /// `None` when the actor account has been deleted
    pub actor: Option<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_delta_constructors() {
        assert_eq!(StatsDelta::uploads(-1).uploads, -1);
        assert_eq!(StatsDelta::uploads(-1).downloads, 0);
        assert_eq!(StatsDelta::active_users(1).active_users, 1);
        assert_eq!(StatsDelta::downloads(1).downloads, 1);
    }
}
