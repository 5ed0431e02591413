//! MIME type detection based on file extensions.

/// Returned when the extension is missing or unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Lowercase extension (no leading dot) to MIME type.
pub const CONTENT_TYPES: &[(&str, &str)] = &[
    ("htm", "text/html"),
    ("html", "text/html"),
    ("hml", "text/html"),
    ("txt", "text/plain"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("css", "text/css"),
    ("xml", "text/xml"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
];

/// Looks up a bare extension. Matching is case-insensitive.
pub fn lookup(extension: &str) -> Option<&'static str> {
    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

/// Resolves the content type for a request path.
///
/// Only the last path segment is considered, and only the text after its
/// last `.`. Never fails: anything unrecognised is `text/plain`.
///
/// # Example
///
/// ```
/// # use staticd::http::mime::content_type_for_path;
/// assert_eq!(content_type_for_path("/img/logo.GIF"), "image/gif");
/// assert_eq!(content_type_for_path("/README"), "text/plain");
/// ```
pub fn content_type_for_path(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);

    file_name
        .rsplit_once('.')
        .and_then(|(_, extension)| lookup(extension))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
