//! Parser for `properties`-style translation files.
//!
//! One `key = value` pair per logical line. `:` and plain whitespace also
//! separate key from value, `#` and `!` start comments, and a trailing
//! backslash continues the value on the next line.

use std::collections::HashMap;

use thiserror::Error;

/// A file that is not valid `properties` syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertiesError {
    #[error("line {line}: malformed \\u escape")]
    InvalidUnicodeEscape { line: usize },
}

/// A physical line joined with its continuations, tagged with the line
/// number it started on.
struct LogicalLine {
    number: usize,
    text: String,
}

/// Parse `content` into `(key, value)` pairs in file order.
///
/// A key that appears twice keeps its first position and its last value.
pub fn parse(content: &str) -> Result<Vec<(String, String)>, PropertiesError> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for line in logical_lines(content) {
        let (raw_key, raw_value) = split_key_value(&line.text);
        let key = unescape(raw_key, line.number)?;
        let value = unescape(raw_value, line.number)?;

        match positions.get(&key) {
            Some(&index) => entries[index].1 = value,
            None => {
                positions.insert(key.clone(), entries.len());
                entries.push((key, value));
            }
        }
    }

    Ok(entries)
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn logical_lines(content: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    let mut current: Option<LogicalLine> = None;

    for (index, physical) in content.lines().enumerate() {
        let trimmed = physical.trim_start();

        match current.as_mut() {
            Some(pending) => pending.text.push_str(trimmed),
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                current = Some(LogicalLine {
                    number: index + 1,
                    text: trimmed.to_string(),
                });
            }
        }

        if let Some(pending) = current.as_mut() {
            if continues(&pending.text) {
                pending.text.pop();
                continue;
            }
        }
        if let Some(done) = current.take() {
            lines.push(done);
        }
    }

    // A continuation on the last line of the file
    if let Some(done) = current.take() {
        lines.push(done);
    }

    lines
}

/// Split at the first unescaped `=`, `:` or whitespace. Whitespace around
/// the separator is dropped; the value keeps its trailing whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = index;
                break;
            }
            c if c.is_whitespace() => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start();
    if let Some(stripped) = rest.strip_prefix(|c: char| c == '=' || c == ':') {
        rest = stripped.trim_start();
    }
    (key, rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or(PropertiesError::InvalidUnicodeEscape { line })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(content: &str) -> Vec<(String, String)> {
        parse(content).expect("Should parse")
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    // ==================== Separator Tests ====================

    #[test]
    fn test_equals_separator() {
        assert_eq!(pairs("greeting=Hello"), vec![pair("greeting", "Hello")]);
    }

    #[test]
    fn test_spaced_equals_separator() {
        assert_eq!(pairs("greeting = Hello there"), vec![pair("greeting", "Hello there")]);
    }

    #[test]
    fn test_colon_and_whitespace_separators() {
        assert_eq!(
            pairs("a: one\nb two"),
            vec![pair("a", "one"), pair("b", "two")]
        );
    }

    #[test]
    fn test_value_may_contain_separators() {
        assert_eq!(
            pairs("url = https://example.com/a=b"),
            vec![pair("url", "https://example.com/a=b")]
        );
    }

    #[test]
    fn test_key_without_value() {
        assert_eq!(pairs("empty"), vec![pair("empty", "")]);
    }

    // ==================== Comment Tests ====================

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let content = "# comment\n\n   ! another\nkey=value\n";
        assert_eq!(pairs(content), vec![pair("key", "value")]);
    }

    // ==================== Continuation Tests ====================

    #[test]
    fn test_line_continuation() {
        let content = "long = first \\\n       second\nnext = x";
        assert_eq!(
            pairs(content),
            vec![pair("long", "first second"), pair("next", "x")]
        );
    }

    #[test]
    fn test_escaped_backslash_does_not_continue() {
        let content = "path = C:\\\\\nnext = x";
        assert_eq!(
            pairs(content),
            vec![pair("path", "C:\\"), pair("next", "x")]
        );
    }

    #[test]
    fn test_continuation_on_last_line() {
        assert_eq!(pairs("key = value\\"), vec![pair("key", "value")]);
    }

    // ==================== Escape Tests ====================

    #[test]
    fn test_escapes() {
        assert_eq!(
            pairs("msg = a\\tb\\nc\\=d"),
            vec![pair("msg", "a\tb\nc=d")]
        );
    }

    #[test]
    fn test_escaped_separator_in_key() {
        assert_eq!(pairs("a\\=b = c"), vec![pair("a=b", "c")]);
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(pairs("accent = caf\\u00e9"), vec![pair("accent", "café")]);
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = parse("ok = fine\nbad = \\u12G4").unwrap_err();
        assert_eq!(err, PropertiesError::InvalidUnicodeEscape { line: 2 });
    }

    #[test]
    fn test_truncated_unicode_escape() {
        let err = parse("bad = \\u12").unwrap_err();
        assert_eq!(err, PropertiesError::InvalidUnicodeEscape { line: 1 });
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_duplicate_key_last_value_wins() {
        let content = "a = 1\nb = 2\na = 3";
        assert_eq!(pairs(content), vec![pair("a", "3"), pair("b", "2")]);
    }

    #[test]
    fn test_utf8_values() {
        assert_eq!(pairs("wave = 👋 ¡Hola!"), vec![pair("wave", "👋 ¡Hola!")]);
    }
}
