//! SQLite schema definitions

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE CHECK(length(email) >= 3),
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL CHECK(length(full_name) >= 1 AND length(full_name) <= 100),
    full_name_search TEXT NOT NULL DEFAULT '',
    avatar_url TEXT,
    role TEXT NOT NULL DEFAULT 'USER' CHECK(role IN ('USER', 'MODERATOR', 'ADMIN')),
    status TEXT NOT NULL DEFAULT 'ACTIVE' CHECK(status IN ('ACTIVE', 'BLOCKED')),
    uploads_count INTEGER NOT NULL DEFAULT 0 CHECK(uploads_count >= 0),
    downloads_count INTEGER NOT NULL DEFAULT 0 CHECK(downloads_count >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_created ON users(created_at);

-- =============================================================================
-- 2. Documents (uploader_id deliberately unconstrained: owners may be deleted)
-- =============================================================================
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL CHECK(length(title) >= 1),
    description TEXT,
    title_search TEXT NOT NULL DEFAULT '',
    description_search TEXT,
    file_name TEXT NOT NULL UNIQUE,
    original_name TEXT NOT NULL,
    file_type TEXT NOT NULL,
    file_size INTEGER NOT NULL CHECK(file_size >= 0),
    uploader_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'VISIBLE' CHECK(status IN ('PROCESSING', 'VISIBLE', 'BLOCKED')),
    faculty TEXT,
    subject_id TEXT,
    download_count INTEGER NOT NULL DEFAULT 0 CHECK(download_count >= 0),
    view_count INTEGER NOT NULL DEFAULT 0 CHECK(view_count >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_status_created ON documents(status, created_at);
CREATE INDEX IF NOT EXISTS idx_documents_uploader ON documents(uploader_id, created_at);
CREATE INDEX IF NOT EXISTS idx_documents_subject ON documents(subject_id);

-- =============================================================================
-- 3. Document Tags (ordered)
-- =============================================================================
CREATE TABLE IF NOT EXISTS document_tags (
    document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    tag TEXT NOT NULL,
    PRIMARY KEY (document_id, position)
);

-- =============================================================================
-- 4. Subjects
-- =============================================================================
CREATE TABLE IF NOT EXISTS subjects (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL UNIQUE CHECK(length(code) >= 1 AND length(code) <= 32),
    name TEXT NOT NULL UNIQUE CHECK(length(name) >= 1 AND length(name) <= 200),
    managing_faculty TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 5. Majors and their ordered subject references (no FK: dangling ids are skipped on read)
-- =============================================================================
CREATE TABLE IF NOT EXISTS majors (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE CHECK(length(name) >= 1 AND length(name) <= 200),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS major_subjects (
    major_id TEXT NOT NULL REFERENCES majors(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    subject_id TEXT NOT NULL,
    PRIMARY KEY (major_id, position)
);

-- =============================================================================
-- 6. Platform Stats (singleton row)
-- =============================================================================
CREATE TABLE IF NOT EXISTS platform_stats (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_uploads INTEGER NOT NULL DEFAULT 0,
    total_downloads INTEGER NOT NULL DEFAULT 0,
    active_users INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 7. Audit Logs (actor_id unconstrained: entries outlive deleted actors)
-- =============================================================================
CREATE TABLE IF NOT EXISTS audit_logs (
    id TEXT PRIMARY KEY,
    actor_id TEXT NOT NULL,
    action TEXT NOT NULL,
    target_id TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_audit_logs_created ON audit_logs(created_at);
"#;
