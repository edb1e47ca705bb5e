//! Audit trail
//!
//! Privileged mutations append an entry keyed by actor and target. Writing
//! the entry never fails the action: errors are logged and dropped.

use std::fmt;

use crate::data::TransactionalRepository;

/// Audited admin actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    BlockUser,
    UnblockUser,
    ResetPassword,
    DeleteUser,
    SetRole,
    BlockDocument,
    UnblockDocument,
    DeleteDocument,
    CreateSubject,
    UpdateSubject,
    DeleteSubject,
    CreateMajor,
    UpdateMajor,
    DeleteMajor,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockUser => "BLOCK_USER",
            Self::UnblockUser => "UNBLOCK_USER",
            Self::ResetPassword => "RESET_PASSWORD",
            Self::DeleteUser => "DELETE_USER",
            Self::SetRole => "SET_ROLE",
            Self::BlockDocument => "BLOCK_DOCUMENT",
            Self::UnblockDocument => "UNBLOCK_DOCUMENT",
            Self::DeleteDocument => "DELETE_DOCUMENT",
            Self::CreateSubject => "CREATE_SUBJECT",
            Self::UpdateSubject => "UPDATE_SUBJECT",
            Self::DeleteSubject => "DELETE_SUBJECT",
            Self::CreateMajor => "CREATE_MAJOR",
            Self::UpdateMajor => "UPDATE_MAJOR",
            Self::DeleteMajor => "DELETE_MAJOR",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append an audit entry, logging instead of returning any failure
pub async fn record(
    repo: &dyn TransactionalRepository,
    actor_id: &str,
    action: AuditAction,
    target_id: Option<&str>,
) {
    match repo
        .insert_audit_log(actor_id, action.as_str(), target_id)
        .await
    {
        Ok(id) => {
            tracing::debug!(log_id = %id, actor_id = %actor_id, action = %action, "Audit entry recorded")
        }
        Err(e) => tracing::error!(
            error = %e,
            actor_id = %actor_id,
            action = %action,
            target_id = ?target_id,
            "Failed to write audit log"
        ),
    }
}
