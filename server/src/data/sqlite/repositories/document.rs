//! Document repository for SQLite operations
//!
//! Tags live in `document_tags` keyed by position so their order survives
//! round trips. Uploaders are LEFT JOINed: a document whose owner has been
//! deleted still lists, with no uploader attached.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{
    DocumentPatch, DocumentRow, DocumentStatus, DocumentWithUploader, ListDocumentsParams,
    NewDocument, UserSummary,
};
use crate::utils::sql::{like_contains, page_offset, search_key};

const DOCUMENT_SELECT: &str = "SELECT d.id, d.title, d.description, d.file_name, d.original_name, \
     d.file_type, d.file_size, d.uploader_id, d.status, d.faculty, d.subject_id, d.download_count, \
     d.view_count, d.created_at, d.updated_at, u.id AS u_id, u.email AS u_email, \
     u.full_name AS u_full_name, u.avatar_url AS u_avatar_url \
     FROM documents d LEFT JOIN users u ON u.id = d.uploader_id";

fn map_document(row: &SqliteRow) -> Result<DocumentWithUploader, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let document = DocumentRow {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        file_name: row.try_get("file_name")?,
        original_name: row.try_get("original_name")?,
        file_type: row.try_get("file_type")?,
        file_size: row.try_get("file_size")?,
        uploader_id: row.try_get("uploader_id")?,
        status: DocumentStatus::parse(&status).unwrap_or_default(),
        tags: Vec::new(),
        faculty: row.try_get("faculty")?,
        subject_id: row.try_get("subject_id")?,
        download_count: row.try_get("download_count")?,
        view_count: row.try_get("view_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };

    let uploader_id: Option<String> = row.try_get("u_id")?;
    let uploader = match uploader_id {
        Some(id) => Some(UserSummary {
            id,
            email: row.try_get("u_email")?,
            full_name: row.try_get("u_full_name")?,
            avatar_url: row.try_get("u_avatar_url")?,
        }),
        None => None,
    };

    Ok(DocumentWithUploader { document, uploader })
}

/// Load tags for the given documents, in position order
async fn load_tags(
    pool: &SqlitePool,
    documents: &mut [DocumentWithUploader],
) -> Result<(), SqliteError> {
    if documents.is_empty() {
        return Ok(());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT document_id, tag FROM document_tags WHERE document_id IN (",
    );
    let mut separated = builder.separated(", ");
    for doc in documents.iter() {
        separated.push_bind(doc.document.id.clone());
    }
    builder.push(") ORDER BY document_id, position");

    let rows = builder
        .build_query_as::<(String, String)>()
        .fetch_all(pool)
        .await?;

    let mut by_document: HashMap<String, Vec<String>> = HashMap::new();
    for (document_id, tag) in rows {
        by_document.entry(document_id).or_default().push(tag);
    }
    for doc in documents.iter_mut() {
        if let Some(tags) = by_document.remove(&doc.document.id) {
            doc.document.tags = tags;
        }
    }
    Ok(())
}

async fn insert_tags(
    conn: &mut SqliteConnection,
    document_id: &str,
    tags: &[String],
) -> Result<(), SqliteError> {
    for (position, tag) in tags.iter().enumerate() {
        sqlx::query("INSERT INTO document_tags (document_id, position, tag) VALUES (?, ?, ?)")
            .bind(document_id)
            .bind(position as i64)
            .bind(tag)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Create document metadata and its tags in one transaction
pub async fn create_document(
    pool: &SqlitePool,
    document: &NewDocument,
) -> Result<DocumentRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();
    let status = DocumentStatus::default();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO documents (id, title, description, title_search, description_search, \
         file_name, original_name, file_type, file_size, uploader_id, status, faculty, subject_id, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&document.title)
    .bind(&document.description)
    .bind(search_key(&document.title))
    .bind(document.description.as_deref().map(search_key))
    .bind(&document.file_name)
    .bind(&document.original_name)
    .bind(&document.file_type)
    .bind(document.file_size)
    .bind(&document.uploader_id)
    .bind(status.as_str())
    .bind(&document.faculty)
    .bind(&document.subject_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_tags(&mut tx, &id, &document.tags).await?;

    tx.commit().await?;

    Ok(DocumentRow {
        id,
        title: document.title.clone(),
        description: document.description.clone(),
        file_name: document.file_name.clone(),
        original_name: document.original_name.clone(),
        file_type: document.file_type.clone(),
        file_size: document.file_size,
        uploader_id: document.uploader_id.clone(),
        status,
        tags: document.tags.clone(),
        faculty: document.faculty.clone(),
        subject_id: document.subject_id.clone(),
        download_count: 0,
        view_count: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Get a document (any status) with tags and uploader
pub async fn get_document(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<DocumentWithUploader>, SqliteError> {
    let sql = format!("{} WHERE d.id = ?", DOCUMENT_SELECT);
    let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(pool).await? else {
        return Ok(None);
    };

    let mut documents = vec![map_document(&row)?];
    load_tags(pool, &mut documents).await?;
    Ok(documents.pop())
}

fn push_document_filters(builder: &mut QueryBuilder<'_, Sqlite>, params: &ListDocumentsParams) {
    builder.push(" WHERE 1 = 1");

    if let Some(status) = params.status {
        builder.push(" AND d.status = ").push_bind(status.as_str());
    }
    if let Some(ref uploader_id) = params.uploader_id {
        builder
            .push(" AND d.uploader_id = ")
            .push_bind(uploader_id.clone());
    }
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = like_contains(&search_key(search));
        builder
            .push(" AND (d.title_search LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\'");
        if params.search_description {
            builder
                .push(" OR d.description_search LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\'");
        }
        builder.push(")");
    }
    if let Some(faculty) = params.faculty.as_deref().filter(|s| !s.is_empty()) {
        builder.push(" AND d.faculty = ").push_bind(faculty.to_string());
    }
    if !params.subject_ids.is_empty() {
        builder.push(" AND d.subject_id IN (");
        let mut separated = builder.separated(", ");
        for subject_id in &params.subject_ids {
            separated.push_bind(subject_id.clone());
        }
        builder.push(")");
    }
    if !params.file_types.is_empty() {
        builder.push(" AND d.file_type IN (");
        let mut separated = builder.separated(", ");
        for file_type in &params.file_types {
            separated.push_bind(file_type.clone());
        }
        builder.push(")");
    }
}

/// List documents with filters, sorting and pagination
pub async fn list_documents(
    pool: &SqlitePool,
    params: &ListDocumentsParams,
) -> Result<(Vec<DocumentWithUploader>, u64), SqliteError> {
    let offset = page_offset(params.page, params.limit);

    let mut builder = QueryBuilder::<Sqlite>::new(DOCUMENT_SELECT);
    push_document_filters(&mut builder, params);
    builder
        .push(format!(
            " ORDER BY {} {}, d.id ASC LIMIT ",
            params.sort.column(),
            params.direction.as_sql()
        ))
        .push_bind(params.limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = builder.build().fetch_all(pool).await?;
    let mut documents = rows
        .iter()
        .map(map_document)
        .collect::<Result<Vec<_>, _>>()?;
    load_tags(pool, &mut documents).await?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM documents d");
    push_document_filters(&mut count, params);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok((documents, total as u64))
}

/// Update editable metadata; tags are replaced wholesale when present
pub async fn update_document(
    pool: &SqlitePool,
    id: &str,
    patch: &DocumentPatch,
) -> Result<Option<DocumentRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE documents SET title = COALESCE(?, title), description = COALESCE(?, description), \
         title_search = COALESCE(?, title_search), \
         description_search = COALESCE(?, description_search), \
         faculty = COALESCE(?, faculty), subject_id = COALESCE(?, subject_id), updated_at = ? \
         WHERE id = ?",
    )
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(patch.title.as_deref().map(search_key))
    .bind(patch.description.as_deref().map(search_key))
    .bind(&patch.faculty)
    .bind(&patch.subject_id)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(ref tags) = patch.tags {
        sqlx::query("DELETE FROM document_tags WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_tags(&mut tx, id, tags).await?;
    }

    tx.commit().await?;

    Ok(get_document(pool, id).await?.map(|d| d.document))
}

/// Set the moderation status
pub async fn set_status(
    pool: &SqlitePool,
    id: &str,
    status: DocumentStatus,
) -> Result<Option<DocumentRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query("UPDATE documents SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(get_document(pool, id).await?.map(|d| d.document))
}

/// Delete metadata (tags cascade). The stored binary is not touched.
pub async fn delete_document(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<DocumentRow>, SqliteError> {
    let Some(existing) = get_document(pool, id).await? else {
        return Ok(None);
    };

    let result = sqlx::query("DELETE FROM documents WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // Lost a race with a concurrent delete
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(existing.document))
}

/// Atomically bump the view counter
pub async fn increment_views(pool: &SqlitePool, id: &str) -> Result<(), SqliteError> {
    sqlx::query("UPDATE documents SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Atomically bump the download counter
pub async fn increment_downloads(pool: &SqlitePool, id: &str) -> Result<(), SqliteError> {
    sqlx::query("UPDATE documents SET download_count = download_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
