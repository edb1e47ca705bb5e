//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Patterns built from this must be compared with `ESCAPE '\'`.
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Substring pattern for a `LIKE ? ESCAPE '\'` search
///
/// ```
/// use docshare_server::utils::sql::like_contains;
///
/// assert_eq!(like_contains("100% sure"), "%100\\% sure%");
/// ```
pub fn like_contains(s: &str) -> String {
    format!("%{}%", escape_like_pattern(s))
}

/// Case-folded form of searchable text
///
/// SQLite's `LIKE` folds ASCII only, so searchable columns keep a copy
/// lowered here and queries lower their pattern the same way.
pub fn search_key(s: &str) -> String {
    s.to_lowercase()
}

/// Row offset for a 1-based page, widened so large pages cannot overflow
pub fn page_offset(page: u32, limit: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(limit)
}
