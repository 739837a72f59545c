//! Escaping for text spliced into JavaScript source.

use cow_utils::CowUtils;

/// Escape a string for embedding inside a JavaScript template literal.
///
/// Escapes backticks, `${` sequences, and backslashes, so the evaluated
/// literal is byte-identical to `s`.
pub fn escape_template_literal(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => result.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => result.push_str("\\$"),
            '\\' => result.push_str("\\\\"),
            _ => result.push(c),
        }
    }

    result
}

/// Wrap `s` in backticks as a template literal with no substitutions.
pub fn template_literal(s: &str) -> String {
    format!("`{}`", escape_template_literal(s))
}

/// Escape backslashes and double quotes for embedding inside a `"..."` string.
pub fn escape_double_quotes(s: &str) -> String {
    s.cow_replace('\\', "\\\\").cow_replace('"', "\\\"").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_template_literal() {
        assert_eq!(escape_template_literal("plain"), "plain");
        assert_eq!(escape_template_literal("a`b"), "a\\`b");
        assert_eq!(escape_template_literal("${x}"), "\\${x}");
        assert_eq!(escape_template_literal("$x"), "$x");
        assert_eq!(
            escape_template_literal(".hover\\:bg-red-200:hover{}"),
            ".hover\\\\:bg-red-200:hover{}"
        );
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(template_literal(".a{color:red}"), "`.a{color:red}`");
        assert_eq!(template_literal(""), "``");
    }

    #[test]
    fn test_escape_double_quotes() {
        assert_eq!(escape_double_quotes("render"), "render");
        assert_eq!(escape_double_quotes("a\"b"), "a\\\"b");
        assert_eq!(escape_double_quotes("a\\b"), "a\\\\b");
    }
}
