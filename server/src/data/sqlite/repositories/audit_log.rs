//! Audit log repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{AuditLogRow, UserSummary};
use crate::utils::sql::page_offset;

/// Append an audit entry and return its ID
pub async fn insert_audit_log(
    pool: &SqlitePool,
    actor_id: &str,
    action: &str,
    target_id: Option<&str>,
) -> Result<String, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO audit_logs (id, actor_id, action, target_id, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(actor_id)
    .bind(action)
    .bind(target_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

type AuditTuple = (
    String,
    String,
    String,
    Option<String>,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// List audit entries newest first, with the actor when it still exists
pub async fn list_audit_logs(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<AuditLogRow>, u64), SqliteError> {
    let offset = page_offset(page, limit);

    let rows = sqlx::query_as::<_, AuditTuple>(
        "SELECT l.id, l.actor_id, l.action, l.target_id, l.created_at, u.id, u.email, u.full_name \
         FROM audit_logs l LEFT JOIN users u ON u.id = l.actor_id \
         ORDER BY l.created_at DESC, l.rowid DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
        .fetch_one(pool)
        .await?;

    let logs = rows
        .into_iter()
        .map(
            |(id, actor_id, action, target_id, created_at, u_id, u_email, u_full_name)| {
                let actor = match (u_id, u_email, u_full_name) {
                    (Some(id), Some(email), Some(full_name)) => Some(UserSummary {
                        id,
                        email,
                        full_name,
                        avatar_url: None,
                    }),
                    _ => None,
                };
                AuditLogRow {
                    id,
                    actor_id,
                    action,
                    target_id,
                    created_at,
                    actor,
                }
            },
        )
        .collect();

    Ok((logs, total as u64))
}
