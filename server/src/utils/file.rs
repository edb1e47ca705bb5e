//! File utility functions

use std::path::PathBuf;

/// Expand a path string to an absolute path.
///
/// - `~` and `~/rest` resolve against the home directory
/// - relative paths (`./data`, `data`, `..`) resolve against the working directory
/// - absolute paths pass through unchanged
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = match path {
        "" => PathBuf::from("."),
        "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => match (path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(path),
        },
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Build an `attachment` Content-Disposition value for a stored file name
///
/// Quotes and backslashes are replaced so the header stays well-formed.
pub fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_expand_path_absolute() {
        assert_eq!(expand_path("/var/lib/docshare"), PathBuf::from("/var/lib/docshare"));
    }

    #[test]
    fn test_expand_path_relative() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("./data"), cwd.join("./data"));
        assert_eq!(expand_path("uploads"), cwd.join("uploads"));
        assert!(expand_path("  data  ").ends_with("data"));
    }

    #[test]
    fn test_expand_path_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(expand_path("~/.docshare"), home.join(".docshare"));
        }
    }

    #[test]
    fn test_expand_path_empty_is_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path(""), cwd.join("."));
    }

    #[test]
    fn test_attachment_disposition() {
        assert_eq!(
            attachment_disposition("abc123.pdf"),
            "attachment; filename=\"abc123.pdf\""
        );
        assert_eq!(
            attachment_disposition("a\"b\\c\n.pdf"),
            "attachment; filename=\"a_b_c_.pdf\""
        );
    }
}
