//! Subject repository for SQLite operations

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{NewSubject, SubjectPatch, SubjectRow};

type SubjectTuple = (String, String, String, Option<String>, i64, i64);

fn to_row(
    (id, code, name, managing_faculty, created_at, updated_at): SubjectTuple,
) -> SubjectRow {
    SubjectRow {
        id,
        code,
        name,
        managing_faculty,
        created_at,
        updated_at,
    }
}

/// Check whether any other subject uses the code or the name
pub async fn subject_exists(
    pool: &SqlitePool,
    code: Option<&str>,
    name: Option<&str>,
    exclude_id: Option<&str>,
) -> Result<bool, SqliteError> {
    if code.is_none() && name.is_none() {
        return Ok(false);
    }

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) > 0 FROM subjects WHERE (");
    let mut separated = builder.separated(" OR ");
    if let Some(code) = code {
        separated.push("code = ").push_bind_unseparated(code.to_string());
    }
    if let Some(name) = name {
        separated.push("name = ").push_bind_unseparated(name.to_string());
    }
    builder.push(")");
    if let Some(exclude_id) = exclude_id {
        builder.push(" AND id != ").push_bind(exclude_id.to_string());
    }

    let exists = builder.build_query_scalar::<bool>().fetch_one(pool).await?;
    Ok(exists)
}

/// Create a subject with a generated CUID2 ID
pub async fn create_subject(
    pool: &SqlitePool,
    subject: &NewSubject,
) -> Result<SubjectRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO subjects (id, code, name, managing_faculty, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&subject.code)
    .bind(&subject.name)
    .bind(&subject.managing_faculty)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(SubjectRow {
        id,
        code: subject.code.clone(),
        name: subject.name.clone(),
        managing_faculty: subject.managing_faculty.clone(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a subject by ID
pub async fn get_subject(pool: &SqlitePool, id: &str) -> Result<Option<SubjectRow>, SqliteError> {
    let row = sqlx::query_as::<_, SubjectTuple>(
        "SELECT id, code, name, managing_faculty, created_at, updated_at FROM subjects WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(to_row))
}

/// List all subjects ordered by name
pub async fn list_subjects(pool: &SqlitePool) -> Result<Vec<SubjectRow>, SqliteError> {
    let rows = sqlx::query_as::<_, SubjectTuple>(
        "SELECT id, code, name, managing_faculty, created_at, updated_at FROM subjects \
         ORDER BY name COLLATE NOCASE ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(to_row).collect())
}

/// Update a subject; absent fields keep their value
pub async fn update_subject(
    pool: &SqlitePool,
    id: &str,
    patch: &SubjectPatch,
) -> Result<Option<SubjectRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE subjects SET code = COALESCE(?, code), name = COALESCE(?, name), \
         managing_faculty = COALESCE(?, managing_faculty), updated_at = ? WHERE id = ?",
    )
    .bind(&patch.code)
    .bind(&patch.name)
    .bind(&patch.managing_faculty)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_subject(pool, id).await
}

/// Delete a subject. Majors and documents referencing it are left as is.
pub async fn delete_subject(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
