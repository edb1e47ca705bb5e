//! Repository trait for the transactional store
//!
//! Handlers and domain services only see this trait object, so the
//! backing store can be swapped without touching the API layer.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    AuditLogRow, DailyUploadRow, DocumentPatch, DocumentRow, DocumentStatus, DocumentWithUploader,
    ListDocumentsParams, ListUsersParams, MajorPatch, MajorRow, MajorWithSubjects, NewDocument,
    NewSubject, NewUser, PlatformStatsRow, StatsDelta, StatusChange, SubjectPatch, SubjectRow,
    UserProfilePatch, UserRole, UserRow, UserStatus,
};

/// Repository trait for accounts, documents, taxonomy, counters and audit logs
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    // ==================== User Operations ====================

    /// Create a user; a duplicate email yields `DataError::Conflict`
    async fn create_user(&self, user: &NewUser) -> Result<UserRow, DataError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError>;

    async fn update_user_profile(
        &self,
        id: &str,
        patch: &UserProfilePatch,
    ) -> Result<Option<UserRow>, DataError>;

    /// Replace the stored password hash. Returns false if the user is missing
    async fn update_user_password(&self, id: &str, password_hash: &str)
    -> Result<bool, DataError>;

    /// Write the status only if it differs from the current one
    async fn set_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> Result<Option<StatusChange<UserRow>>, DataError>;

    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<UserRow>, DataError>;

    /// Delete a user, returning the row as it was before deletion
    async fn delete_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    async fn list_users(&self, params: &ListUsersParams) -> Result<(Vec<UserRow>, u64), DataError>;

    /// Atomically add the deltas to the user's counters (clamped at zero)
    async fn adjust_user_counters(
        &self,
        id: &str,
        uploads: i64,
        downloads: i64,
    ) -> Result<(), DataError>;

    // ==================== Document Operations ====================

    async fn create_document(&self, document: &NewDocument) -> Result<DocumentRow, DataError>;

    async fn get_document(&self, id: &str) -> Result<Option<DocumentWithUploader>, DataError>;

    async fn list_documents(
        &self,
        params: &ListDocumentsParams,
    ) -> Result<(Vec<DocumentWithUploader>, u64), DataError>;

    async fn update_document(
        &self,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<Option<DocumentRow>, DataError>;

    async fn set_document_status(
        &self,
        id: &str,
        status: DocumentStatus,
    ) -> Result<Option<DocumentRow>, DataError>;

    /// Delete document metadata, returning the row as it was before deletion
    async fn delete_document(&self, id: &str) -> Result<Option<DocumentRow>, DataError>;

    async fn increment_document_views(&self, id: &str) -> Result<(), DataError>;

    async fn increment_document_downloads(&self, id: &str) -> Result<(), DataError>;

    // ==================== Subject Operations ====================

    /// True if another subject already uses the code or the name
    async fn subject_exists(
        &self,
        code: Option<&str>,
        name: Option<&str>,
        exclude_id: Option<&str>,
    ) -> Result<bool, DataError>;

    async fn create_subject(&self, subject: &NewSubject) -> Result<SubjectRow, DataError>;

    async fn get_subject(&self, id: &str) -> Result<Option<SubjectRow>, DataError>;

    /// All subjects ordered by name
    async fn list_subjects(&self) -> Result<Vec<SubjectRow>, DataError>;

    async fn update_subject(
        &self,
        id: &str,
        patch: &SubjectPatch,
    ) -> Result<Option<SubjectRow>, DataError>;

    async fn delete_subject(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Major Operations ====================

    /// True if another major already uses the name
    async fn major_name_exists(
        &self,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, DataError>;

    async fn create_major(&self, name: &str, subject_ids: &[String])
    -> Result<MajorRow, DataError>;

    /// All majors ordered by name with subjects resolved in stored order
    async fn list_majors(&self) -> Result<Vec<MajorWithSubjects>, DataError>;

    async fn update_major(
        &self,
        id: &str,
        patch: &MajorPatch,
    ) -> Result<Option<MajorRow>, DataError>;

    async fn delete_major(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Statistics Operations ====================

    /// Atomically add the deltas to the singleton counters row, creating it if needed
    async fn adjust_platform_stats(&self, delta: StatsDelta) -> Result<(), DataError>;

    async fn get_platform_stats(&self) -> Result<PlatformStatsRow, DataError>;

    /// Per-day upload counts for documents created at or after `since`, ascending
    async fn daily_uploads_since(&self, since: i64) -> Result<Vec<DailyUploadRow>, DataError>;

    // ==================== Audit Log Operations ====================

    async fn insert_audit_log(
        &self,
        actor_id: &str,
        action: &str,
        target_id: Option<&str>,
    ) -> Result<String, DataError>;

    /// Audit logs newest first
    async fn list_audit_logs(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<AuditLogRow>, u64), DataError>;
}
