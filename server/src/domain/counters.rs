//! Denormalized counter updates
//!
//! Counters are eventually consistent: each bump is one atomic increment and
//! a failed bump is logged, never surfaced, so the action that triggered it
//! still succeeds.

use crate::data::TransactionalRepository;
use crate::data::types::StatsDelta;

/// Apply a delta to the platform counters
pub async fn bump_platform(repo: &dyn TransactionalRepository, delta: StatsDelta) {
    if let Err(e) = repo.adjust_platform_stats(delta).await {
        tracing::warn!(
            error = %e,
            uploads = delta.uploads,
            downloads = delta.downloads,
            active_users = delta.active_users,
            "Failed to update platform counters"
        );
    }
}

/// Apply a delta to a user's upload and download counters
pub async fn bump_user(
    repo: &dyn TransactionalRepository,
    user_id: &str,
    uploads: i64,
    downloads: i64,
) {
    if let Err(e) = repo.adjust_user_counters(user_id, uploads, downloads).await {
        tracing::warn!(
            error = %e,
            user_id = %user_id,
            uploads,
            downloads,
            "Failed to update user counters"
        );
    }
}

/// Record a new upload by `owner_id`
pub async fn record_upload(repo: &dyn TransactionalRepository, owner_id: &str) {
    bump_user(repo, owner_id, 1, 0).await;
    bump_platform(repo, StatsDelta::uploads(1)).await;
}

/// Record removal of a document uploaded by `owner_id`
pub async fn record_removal(repo: &dyn TransactionalRepository, owner_id: &str) {
    bump_user(repo, owner_id, -1, 0).await;
    bump_platform(repo, StatsDelta::uploads(-1)).await;
}

/// Record a download of a document uploaded by `owner_id`
pub async fn record_download(repo: &dyn TransactionalRepository, owner_id: &str) {
    bump_user(repo, owner_id, 0, 1).await;
    bump_platform(repo, StatsDelta::downloads(1)).await;
}
