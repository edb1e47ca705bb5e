//! User repository for SQLite operations

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{
    ListUsersParams, NewUser, StatusChange, UserProfilePatch, UserRole, UserRow, UserStatus,
};
use crate::utils::sql::{like_contains, page_offset, search_key};

const USER_COLUMNS: &str = "id, email, password_hash, full_name, avatar_url, role, status, \
                            uploads_count, downloads_count, created_at, updated_at";

fn map_user(row: &SqliteRow) -> Result<UserRow, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    Ok(UserRow {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        avatar_url: row.try_get("avatar_url")?,
        role: UserRole::parse(&role).unwrap_or_default(),
        status: UserStatus::parse(&status).unwrap_or_default(),
        uploads_count: row.try_get("uploads_count")?,
        downloads_count: row.try_get("downloads_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Create a new ACTIVE user with a generated CUID2 ID
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<UserRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, full_name, full_name_search, role, status, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.full_name)
    .bind(search_key(&user.full_name))
    .bind(user.role.as_str())
    .bind(UserStatus::Active.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(UserRow {
        id,
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        full_name: user.full_name.clone(),
        avatar_url: None,
        role: user.role,
        status: UserStatus::Active,
        uploads_count: 0,
        downloads_count: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_user).transpose()?)
}

/// Get a user by (normalized) email
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, SqliteError> {
    let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
    let row = sqlx::query(&sql).bind(email).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_user).transpose()?)
}

/// Update display fields; absent fields keep their value
pub async fn update_profile(
    pool: &SqlitePool,
    id: &str,
    patch: &UserProfilePatch,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE users SET full_name = COALESCE(?, full_name), \
         full_name_search = COALESCE(?, full_name_search), avatar_url = COALESCE(?, avatar_url), \
         updated_at = ? WHERE id = ?",
    )
    .bind(&patch.full_name)
    .bind(patch.full_name.as_deref().map(search_key))
    .bind(&patch.avatar_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user(pool, id).await
}

/// Replace the password hash
pub async fn update_password(
    pool: &SqlitePool,
    id: &str,
    password_hash: &str,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Conditionally set the status; `changed` reports whether a write happened
pub async fn set_status(
    pool: &SqlitePool,
    id: &str,
    status: UserStatus,
) -> Result<Option<StatusChange<UserRow>>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result =
        sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ? AND status != ?")
            .bind(status.as_str())
            .bind(now)
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;

    let changed = result.rows_affected() > 0;
    Ok(get_user(pool, id)
        .await?
        .map(|row| StatusChange { row, changed }))
}

/// Set the role
pub async fn set_role(
    pool: &SqlitePool,
    id: &str,
    role: UserRole,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role.as_str())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user(pool, id).await
}

/// Delete a user and return the removed row. Documents are left in place.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let sql = format!("DELETE FROM users WHERE id = ? RETURNING {}", USER_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(map_user).transpose()?)
}

fn push_user_filters(builder: &mut QueryBuilder<'_, Sqlite>, params: &ListUsersParams) {
    builder.push(" WHERE 1 = 1");
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = like_contains(&search_key(search));
        builder
            .push(" AND (full_name_search LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR email LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(role) = params.role {
        builder.push(" AND role = ").push_bind(role.as_str());
    }
    if let Some(status) = params.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
}

/// List users with filters, sorting and pagination
pub async fn list_users(
    pool: &SqlitePool,
    params: &ListUsersParams,
) -> Result<(Vec<UserRow>, u64), SqliteError> {
    let offset = page_offset(params.page, params.limit);

    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM users", USER_COLUMNS));
    push_user_filters(&mut builder, params);
    builder
        .push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            params.sort.column(),
            params.direction.as_sql()
        ))
        .push_bind(params.limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = builder.build().fetch_all(pool).await?;
    let users = rows.iter().map(map_user).collect::<Result<Vec<_>, _>>()?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users");
    push_user_filters(&mut count, params);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    Ok((users, total as u64))
}

/// Atomically add to the per-user counters, never dropping below zero
pub async fn adjust_counters(
    pool: &SqlitePool,
    id: &str,
    uploads: i64,
    downloads: i64,
) -> Result<(), SqliteError> {
    sqlx::query(
        "UPDATE users SET uploads_count = MAX(uploads_count + ?, 0), \
         downloads_count = MAX(downloads_count + ?, 0) WHERE id = ?",
    )
    .bind(uploads)
    .bind(downloads)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
