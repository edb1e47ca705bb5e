//! Platform statistics repository for SQLite operations
//!
//! The counters live in a single row (`id = 1`) that is created on first use.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{DailyUploadRow, PlatformStatsRow, StatsDelta};

/// Atomically add the deltas, inserting the row if it does not exist yet
pub async fn adjust_platform_stats(pool: &SqlitePool, delta: StatsDelta) -> Result<(), SqliteError> {
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO platform_stats (id, total_uploads, total_downloads, active_users, updated_at) \
         VALUES (1, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
         total_uploads = total_uploads + excluded.total_uploads, \
         total_downloads = total_downloads + excluded.total_downloads, \
         active_users = active_users + excluded.active_users, \
         updated_at = excluded.updated_at",
    )
    .bind(delta.uploads)
    .bind(delta.downloads)
    .bind(delta.active_users)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Read the counters; all zero when nothing has been recorded
pub async fn get_platform_stats(pool: &SqlitePool) -> Result<PlatformStatsRow, SqliteError> {
    let row = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT total_uploads, total_downloads, active_users FROM platform_stats WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row
        .map(
            |(total_uploads, total_downloads, active_users)| PlatformStatsRow {
                total_uploads,
                total_downloads,
                active_users,
            },
        )
        .unwrap_or_default())
}

/// Count documents per UTC day created at or after `since`; empty days are absent
pub async fn daily_uploads_since(
    pool: &SqlitePool,
    since: i64,
) -> Result<Vec<DailyUploadRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT date(created_at, 'unixepoch') AS day, COUNT(*) FROM documents \
         WHERE created_at >= ? GROUP BY day ORDER BY day ASC",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(date, count)| DailyUploadRow { date, count })
        .collect())
}
