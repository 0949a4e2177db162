//! Input normalization applied before parsing

/// Trim the raw input and spell out `&&` / `||` connectives.
///
/// Only operators padded by a single space on each side are rewritten;
/// `a&&b` and `a &&b` pass through untouched.
pub fn format_query(query: &str) -> String {
    query
        .trim()
        .replace(" && ", " AND ")
        .replace(" || ", " OR ")
}
