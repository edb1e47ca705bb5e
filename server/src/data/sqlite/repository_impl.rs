//! TransactionalRepository trait implementation for SQLite
//!
//! Implements the trait for `Arc<SqliteService>` by delegating to the
//! free functions in `repositories`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    AuditLogRow, DailyUploadRow, DocumentPatch, DocumentRow, DocumentStatus, DocumentWithUploader,
    ListDocumentsParams, ListUsersParams, MajorPatch, MajorRow, MajorWithSubjects, NewDocument,
    NewSubject, NewUser, PlatformStatsRow, StatsDelta, StatusChange, SubjectPatch, SubjectRow,
    UserProfilePatch, UserRole, UserRow, UserStatus,
};

use super::SqliteService;
use super::repositories::{audit_log, document, major, stats, subject, user};

#[async_trait]
impl TransactionalRepository for Arc<SqliteService> {
    // ==================== User Operations ====================

    async fn create_user(&self, new_user: &NewUser) -> Result<UserRow, DataError> {
        user::create_user(self.pool(), new_user)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), id).await.map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError> {
        user::get_by_email(self.pool(), email)
            .await
            .map_err(Into::into)
    }

    async fn update_user_profile(
        &self,
        id: &str,
        patch: &UserProfilePatch,
    ) -> Result<Option<UserRow>, DataError> {
        user::update_profile(self.pool(), id, patch)
            .await
            .map_err(Into::into)
    }

    async fn update_user_password(
        &self,
        id: &str,
        password_hash: &str,
    ) -> Result<bool, DataError> {
        user::update_password(self.pool(), id, password_hash)
            .await
            .map_err(Into::into)
    }

    async fn set_user_status(
        &self,
        id: &str,
        status: UserStatus,
    ) -> Result<Option<StatusChange<UserRow>>, DataError> {
        user::set_status(self.pool(), id, status)
            .await
            .map_err(Into::into)
    }

    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<UserRow>, DataError> {
        user::set_role(self.pool(), id, role)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::delete_user(self.pool(), id).await.map_err(Into::into)
    }

    async fn list_users(&self, params: &ListUsersParams) -> Result<(Vec<UserRow>, u64), DataError> {
        user::list_users(self.pool(), params)
            .await
            .map_err(Into::into)
    }

    async fn adjust_user_counters(
        &self,
        id: &str,
        uploads: i64,
        downloads: i64,
    ) -> Result<(), DataError> {
        user::adjust_counters(self.pool(), id, uploads, downloads)
            .await
            .map_err(Into::into)
    }

    // ==================== Document Operations ====================

    async fn create_document(&self, new_document: &NewDocument) -> Result<DocumentRow, DataError> {
        document::create_document(self.pool(), new_document)
            .await
            .map_err(Into::into)
    }

    async fn get_document(&self, id: &str) -> Result<Option<DocumentWithUploader>, DataError> {
        document::get_document(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_documents(
        &self,
        params: &ListDocumentsParams,
    ) -> Result<(Vec<DocumentWithUploader>, u64), DataError> {
        document::list_documents(self.pool(), params)
            .await
            .map_err(Into::into)
    }

    async fn update_document(
        &self,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<Option<DocumentRow>, DataError> {
        document::update_document(self.pool(), id, patch)
            .await
            .map_err(Into::into)
    }

    async fn set_document_status(
        &self,
        id: &str,
        status: DocumentStatus,
    ) -> Result<Option<DocumentRow>, DataError> {
        document::set_status(self.pool(), id, status)
            .await
            .map_err(Into::into)
    }

    async fn delete_document(&self, id: &str) -> Result<Option<DocumentRow>, DataError> {
        document::delete_document(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn increment_document_views(&self, id: &str) -> Result<(), DataError> {
        document::increment_views(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn increment_document_downloads(&self, id: &str) -> Result<(), DataError> {
        document::increment_downloads(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Subject Operations ====================

    async fn subject_exists(
        &self,
        code: Option<&str>,
        name: Option<&str>,
        exclude_id: Option<&str>,
    ) -> Result<bool, DataError> {
        subject::subject_exists(self.pool(), code, name, exclude_id)
            .await
            .map_err(Into::into)
    }

    async fn create_subject(&self, new_subject: &NewSubject) -> Result<SubjectRow, DataError> {
        subject::create_subject(self.pool(), new_subject)
            .await
            .map_err(Into::into)
    }

    async fn get_subject(&self, id: &str) -> Result<Option<SubjectRow>, DataError> {
        subject::get_subject(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_subjects(&self) -> Result<Vec<SubjectRow>, DataError> {
        subject::list_subjects(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn update_subject(
        &self,
        id: &str,
        patch: &SubjectPatch,
    ) -> Result<Option<SubjectRow>, DataError> {
        subject::update_subject(self.pool(), id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_subject(&self, id: &str) -> Result<bool, DataError> {
        subject::delete_subject(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Major Operations ====================

    async fn major_name_exists(
        &self,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, DataError> {
        major::major_name_exists(self.pool(), name, exclude_id)
            .await
            .map_err(Into::into)
    }

    async fn create_major(
        &self,
        name: &str,
        subject_ids: &[String],
    ) -> Result<MajorRow, DataError> {
        major::create_major(self.pool(), name, subject_ids)
            .await
            .map_err(Into::into)
    }

    async fn list_majors(&self) -> Result<Vec<MajorWithSubjects>, DataError> {
        major::list_majors(self.pool()).await.map_err(Into::into)
    }

    async fn update_major(
        &self,
        id: &str,
        patch: &MajorPatch,
    ) -> Result<Option<MajorRow>, DataError> {
        major::update_major(self.pool(), id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_major(&self, id: &str) -> Result<bool, DataError> {
        major::delete_major(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Statistics Operations ====================

    async fn adjust_platform_stats(&self, delta: StatsDelta) -> Result<(), DataError> {
        stats::adjust_platform_stats(self.pool(), delta)
            .await
            .map_err(Into::into)
    }

    async fn get_platform_stats(&self) -> Result<PlatformStatsRow, DataError> {
        stats::get_platform_stats(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn daily_uploads_since(&self, since: i64) -> Result<Vec<DailyUploadRow>, DataError> {
        stats::daily_uploads_since(self.pool(), since)
            .await
            .map_err(Into::into)
    }

    // ==================== Audit Log Operations ====================

    async fn insert_audit_log(
        &self,
        actor_id: &str,
        action: &str,
        target_id: Option<&str>,
    ) -> Result<String, DataError> {
        audit_log::insert_audit_log(self.pool(), actor_id, action, target_id)
            .await
            .map_err(Into::into)
    }

    async fn list_audit_logs(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<AuditLogRow>, u64), DataError> {
        audit_log::list_audit_logs(self.pool(), page, limit)
            .await
            .map_err(Into::into)
    }
}
