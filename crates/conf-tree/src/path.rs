//! Dotted path parsing
//!
//! Paths address nested map entries with dot-separated segments:
//! `config.database.host`. Segments must be non-empty; a path like `a..b`
//! or a trailing dot is invalid input.

/// Split a dotted key into its segments.
///
/// Returns `None` when the path is empty or contains an empty segment.
/// Tree reads treat an invalid path as absent; write-facing callers are
/// expected to reject it before mutating.
///
/// # Examples
///
/// ```
/// use conf_tree::parse_path;
///
/// assert_eq!(parse_path("config.database.host"),
///            Some(vec!["config", "database", "host"]));
/// assert_eq!(parse_path("name"), Some(vec!["name"]));
/// assert_eq!(parse_path(""), None);
/// assert_eq!(parse_path("a..b"), None);
/// ```
pub fn parse_path(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}
