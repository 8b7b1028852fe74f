//! JSON Pointer implementation (RFC 6901).
//!
//! Used both to label locations in the schema for error messages and to
//! resolve local `$ref` fragments. Segments are `/`-separated, with `~`
//! escaped as `~0` and `/` escaped as `~1`.

/// Appends a segment to a JSON Pointer path, applying RFC 6901 escaping.
///
/// Escaping rules: `~` -> `~0`, `/` -> `~1`
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Returns a new JSON Pointer path by appending a segment to the given path.
#[must_use]
pub fn format(path: &str, segment: &str) -> String {
    let mut result: String = path.to_string();
    push_segment(&mut result, segment);
    result
}

/// Splits a JSON Pointer into unescaped segments.
///
/// The empty pointer refers to the whole document and yields no segments.
/// Returns `None` when the pointer is non-empty but does not start with `/`,
/// or when a `~` is not followed by `0` or `1`.
#[must_use]
pub fn parse(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest: &str = pointer.strip_prefix('/')?;
    rest.split('/').map(unescape).collect()
}

fn unescape(raw: &str) -> Option<String> {
    let mut out: String = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_segment_escapes_slash_and_tilde() {
        let mut path = String::new();
        push_segment(&mut path, "a/b");
        push_segment(&mut path, "c~d");
        assert_eq!(path, "/a~1b/c~0d");
    }

    #[test]
    fn push_segment_escape_order_is_unambiguous() {
        let mut path = String::new();
        push_segment(&mut path, "~1");
        assert_eq!(path, "/~01");
    }

    #[test]
    fn format_builds_nested_paths() {
        let properties: String = format("", "properties");
        assert_eq!(format(&properties, "foo-bar"), "/properties/foo-bar");
    }

    #[test]
    fn format_empty_segment() {
        assert_eq!(format("", ""), "/");
    }

    #[test]
    fn parse_empty_pointer_is_document_root() {
        assert_eq!(parse(""), Some(Vec::new()));
    }

    #[test]
    fn parse_unescapes_segments() {
        let expected: Vec<String> = vec!["definitions".to_string(), "a/b~c".to_string()];
        assert_eq!(parse("/definitions/a~1b~0c"), Some(expected));
    }

    #[test]
    fn parse_keeps_empty_segments() {
        let expected: Vec<String> = vec![String::new()];
        assert_eq!(parse("/"), Some(expected));
    }

    #[test]
    fn parse_rejects_missing_leading_slash() {
        assert_eq!(parse("definitions/Foo"), None);
    }

    #[test]
    fn parse_rejects_bad_escape() {
        assert_eq!(parse("/a~2"), None);
        assert_eq!(parse("/a~"), None);
    }

    #[test]
    fn format_then_parse_recovers_segment() {
        let pointer: String = format("/$defs", "x~/y");
        let expected: Vec<String> = vec!["$defs".to_string(), "x~/y".to_string()];
        assert_eq!(parse(&pointer), Some(expected));
    }
}
