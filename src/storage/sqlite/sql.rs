//! SQL helper functions.
//!
//! LIKE patterns built from user input must escape `%`, `_` and `\` so that a
//! search for `100%` matches the literal text rather than everything.

/// Escapes SQL LIKE wildcards in a string to make them literal.
///
/// Use together with `ESCAPE '\'` in the query.
///
/// # Examples
///
/// ```
/// use linkshelf::storage::sqlite::escape_like_wildcards;
///
/// assert_eq!(escape_like_wildcards("100%"), "100\\%");
/// assert_eq!(escape_like_wildcards("user_name"), "user\\_name");
/// assert_eq!(escape_like_wildcards("path\\file"), "path\\\\file");
/// ```
#[must_use]
pub fn escape_like_wildcards(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            },
            _ => result.push(c),
        }
    }
    result
}

/// Builds a `%...%` substring pattern from a user query.
///
/// # Examples
///
/// ```
/// use linkshelf::storage::sqlite::contains_pattern;
///
/// assert_eq!(contains_pattern("  rust "), "%rust%");
/// assert_eq!(contains_pattern("50%"), "%50\\%%");
/// ```
#[must_use]
pub fn contains_pattern(query: &str) -> String {
    format!("%{}%", escape_like_wildcards(query.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards_plain_text() {
        assert_eq!(escape_like_wildcards("Projects"), "Projects");
        assert_eq!(escape_like_wildcards(""), "");
    }

    #[test]
    fn test_escape_like_wildcards_mixed() {
        assert_eq!(escape_like_wildcards("a%b_c\\d"), "a\\%b\\_c\\\\d");
    }

    #[test]
    fn test_contains_pattern_trims() {
        assert_eq!(contains_pattern("\twork\n"), "%work%");
    }
}
