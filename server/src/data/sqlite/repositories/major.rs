//! Major repository for SQLite operations
//!
//! A major keeps an ordered list of subject ids in `major_subjects`. The ids
//! are not constrained, so resolving them skips subjects that no longer exist.

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{MajorPatch, MajorRow, MajorWithSubjects, SubjectRow};

/// Check whether any other major uses the name
pub async fn major_name_exists(
    pool: &SqlitePool,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<bool, SqliteError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM majors WHERE name = ? AND (? IS NULL OR id != ?)",
    )
    .bind(name)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

async fn insert_subject_ids(
    conn: &mut SqliteConnection,
    major_id: &str,
    subject_ids: &[String],
) -> Result<(), SqliteError> {
    for (position, subject_id) in subject_ids.iter().enumerate() {
        sqlx::query("INSERT INTO major_subjects (major_id, position, subject_id) VALUES (?, ?, ?)")
            .bind(major_id)
            .bind(position as i64)
            .bind(subject_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Create a major with its ordered subject references
pub async fn create_major(
    pool: &SqlitePool,
    name: &str,
    subject_ids: &[String],
) -> Result<MajorRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO majors (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    insert_subject_ids(&mut tx, &id, subject_ids).await?;

    tx.commit().await?;

    Ok(MajorRow {
        id,
        name: name.to_string(),
        subject_ids: subject_ids.to_vec(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a major by ID with its raw subject ids
pub async fn get_major(pool: &SqlitePool, id: &str) -> Result<Option<MajorRow>, SqliteError> {
    let Some((id, name, created_at, updated_at)) =
        sqlx::query_as::<_, (String, String, i64, i64)>(
            "SELECT id, name, created_at, updated_at FROM majors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let subject_ids: Vec<String> = sqlx::query_scalar(
        "SELECT subject_id FROM major_subjects WHERE major_id = ? ORDER BY position",
    )
    .bind(&id)
    .fetch_all(pool)
    .await?;

    Ok(Some(MajorRow {
        id,
        name,
        subject_ids,
        created_at,
        updated_at,
    }))
}

/// List majors ordered by name with subjects resolved in stored order
pub async fn list_majors(pool: &SqlitePool) -> Result<Vec<MajorWithSubjects>, SqliteError> {
    let majors = sqlx::query_as::<_, (String, String, i64, i64)>(
        "SELECT id, name, created_at, updated_at FROM majors ORDER BY name COLLATE NOCASE ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;

    let references = sqlx::query_as::<_, (String, String)>(
        "SELECT major_id, subject_id FROM major_subjects ORDER BY major_id, position",
    )
    .fetch_all(pool)
    .await?;

    let resolved = sqlx::query_as::<
        _,
        (String, String, String, String, Option<String>, i64, i64),
    >(
        "SELECT ms.major_id, s.id, s.code, s.name, s.managing_faculty, s.created_at, s.updated_at \
         FROM major_subjects ms JOIN subjects s ON s.id = ms.subject_id \
         ORDER BY ms.major_id, ms.position",
    )
    .fetch_all(pool)
    .await?;

    let mut ids_by_major: HashMap<String, Vec<String>> = HashMap::new();
    for (major_id, subject_id) in references {
        ids_by_major.entry(major_id).or_default().push(subject_id);
    }

    let mut subjects_by_major: HashMap<String, Vec<SubjectRow>> = HashMap::new();
    for (major_id, id, code, name, managing_faculty, created_at, updated_at) in resolved {
        subjects_by_major
            .entry(major_id)
            .or_default()
            .push(SubjectRow {
                id,
                code,
                name,
                managing_faculty,
                created_at,
                updated_at,
            });
    }

    Ok(majors
        .into_iter()
        .map(|(id, name, created_at, updated_at)| MajorWithSubjects {
            subjects: subjects_by_major.remove(&id).unwrap_or_default(),
            major: MajorRow {
                subject_ids: ids_by_major.remove(&id).unwrap_or_default(),
                id,
                name,
                created_at,
                updated_at,
            },
        })
        .collect())
}

/// Update a major; a present subject list replaces the stored one
pub async fn update_major(
    pool: &SqlitePool,
    id: &str,
    patch: &MajorPatch,
) -> Result<Option<MajorRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    let result =
        sqlx::query("UPDATE majors SET name = COALESCE(?, name), updated_at = ? WHERE id = ?")
            .bind(&patch.name)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(ref subject_ids) = patch.subject_ids {
        sqlx::query("DELETE FROM major_subjects WHERE major_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_subject_ids(&mut tx, id, subject_ids).await?;
    }

    tx.commit().await?;

    get_major(pool, id).await
}

/// Delete a major (its subject references cascade)
pub async fn delete_major(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM majors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
