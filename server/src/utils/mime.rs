//! Document content type policy
//!
//! Which MIME types may be uploaded, how an upload's type is determined, and
//! how short aliases in list filters (`pdf`, `word`) map to MIME types.

/// MIME types accepted for upload
pub const ALLOWED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "text/markdown",
    "application/zip",
    "image/png",
    "image/jpeg",
];

const GENERIC_TYPE: &str = "application/octet-stream";

/// Lowercase a content type and drop its parameters (`; charset=utf-8`)
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Map equivalent spellings onto the canonical allowed type
fn canonical(mime: &str) -> Option<&'static str> {
    let mime = match mime {
        "text/x-markdown" => "text/markdown",
        "application/x-zip-compressed" => "application/zip",
        "image/jpg" | "image/pjpeg" => "image/jpeg",
        other => other,
    };
    ALLOWED_DOCUMENT_TYPES.iter().copied().find(|t| *t == mime)
}

/// Determine the stored type of an upload
///
/// Uses the part's declared content type; when it is missing or generic,
/// guesses from the file name. Returns `None` for disallowed types.
pub fn resolve_upload_type(content_type: Option<&str>, file_name: &str) -> Option<&'static str> {
    let declared = content_type.map(essence).filter(|ct| !ct.is_empty());

    match declared.as_deref() {
        Some(ct) if ct != GENERIC_TYPE => canonical(ct),
        _ => mime_guess::from_path(file_name)
            .iter()
            .find_map(|guess| canonical(guess.essence_str())),
    }
}

/// Expand a `fileType` filter value into the MIME types it matches
///
/// Accepts short aliases (`pdf`, `docx`, `word`) or an exact MIME type.
pub fn file_type_filter(value: &str) -> Vec<String> {
    let value = value.trim().to_ascii_lowercase();
    let types: &[&str] = match value.as_str() {
        "pdf" => &["application/pdf"],
        "doc" => &["application/msword"],
        "docx" => &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
        "word" => &[
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ],
        "ppt" => &["application/vnd.ms-powerpoint"],
        "pptx" => &["application/vnd.openxmlformats-officedocument.presentationml.presentation"],
        "powerpoint" => &[
            "application/vnd.ms-powerpoint",
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ],
        "xls" => &["application/vnd.ms-excel"],
        "xlsx" => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        "excel" => &[
            "application/vnd.ms-excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ],
        "txt" | "text" => &["text/plain"],
        "md" | "markdown" => &["text/markdown"],
        "zip" => &["application/zip"],
        "png" => &["image/png"],
        "jpg" | "jpeg" => &["image/jpeg"],
        "image" => &["image/png", "image/jpeg"],
        _ => return vec![value],
    };
    types.iter().map(|t| t.to_string()).collect()
}
