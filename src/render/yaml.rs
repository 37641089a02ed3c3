//! YAML scalar writing for front matter.
//!
//! Front matter is assembled line by line, so every scalar must be written
//! in a form any YAML parser reads back unchanged: plain only when provably
//! safe, otherwise double-quoted with escapes. Free text goes into literal
//! blocks when it can survive one.

/// Keywords a YAML 1.1 parser would read as something other than a string.
const RESERVED_PLAIN: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "y", "n", "null",
];

/// Whether `s` can be written as a plain (unquoted) scalar.
///
/// Deliberately narrow: an ASCII letter or underscore followed by letters,
/// digits, `_`, `-` or `.`, and not a YAML keyword.
#[must_use]
pub fn is_plain_safe(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !RESERVED_PLAIN.contains(&s.to_ascii_lowercase().as_str())
}

/// Characters that cannot appear raw inside a double-quoted scalar.
const fn needs_escape(c: char) -> bool {
    matches!(
        c,
        '\\' | '"'
            | '\u{0}'..='\u{1f}'
            | '\u{7f}'..='\u{9f}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{feff}'
            | '\u{fffe}'
            | '\u{ffff}'
    )
}

/// Writes `s` as a double-quoted scalar.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if !needs_escape(c) {
            out.push(c);
            continue;
        }
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if u32::from(c) <= 0xff => out.push_str(&format!("\\x{:02X}", u32::from(c))),
            c => out.push_str(&format!("\\u{:04X}", u32::from(c))),
        }
    }
    out.push('"');
    out
}

/// Writes `s` plain when safe, quoted otherwise. Used for mapping keys and
/// identifiers.
#[must_use]
pub fn key(s: &str) -> String {
    if is_plain_safe(s) {
        s.to_string()
    } else {
        quote(s)
    }
}

/// Writes `key: text` with `text` as a literal block scalar indented by two
/// spaces.
///
/// The chomping indicator keeps trailing newlines intact. Text that a
/// literal block cannot reproduce (empty, only newlines, or containing
/// characters that need escaping) falls back to a quoted scalar.
#[must_use]
pub fn literal_block(key: &str, text: &str) -> Vec<String> {
    let body = text.trim_end_matches('\n');
    let trailing = text.len() - body.len();

    let unrepresentable = text
        .chars()
        .any(|c| !matches!(c, '\n' | '\t' | '\\' | '"') && needs_escape(c));
    if body.is_empty() || unrepresentable {
        return vec![format!("{key}: {}", quote(text))];
    }

    let indicator = if body.starts_with(' ') || body.starts_with('\n') {
        "2"
    } else {
        ""
    };
    let chomping = match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    };

    let mut lines = vec![format!("{key}: |{indicator}{chomping}")];
    lines.extend(body.split('\n').map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("  {line}")
        }
    }));
    lines.extend(std::iter::repeat_n(String::new(), trailing.saturating_sub(1)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse_value(key_line: &[String]) -> String {
        let doc = format!("{}\n", key_line.join("\n"));
        let map: serde_yaml::Mapping = serde_yaml::from_str(&doc).unwrap();
        map.get("k").and_then(|v| v.as_str()).unwrap().to_string()
    }

    #[test]
    fn test_plain_safe_identifiers() {
        assert!(is_plain_safe("requirements_analysis"));
        assert!(is_plain_safe("act-1"));
        assert!(is_plain_safe("v1.2"));
        assert!(!is_plain_safe(""));
        assert!(!is_plain_safe("1st"));
        assert!(!is_plain_safe("has space"));
        assert!(!is_plain_safe("colon:"));
        assert!(!is_plain_safe("yes"));
        assert!(!is_plain_safe("Null"));
        assert!(!is_plain_safe("-dash"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), r#""plain""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote("a\\b"), r#""a\\b""#);
        assert_eq!(quote("line\nbreak"), r#""line\nbreak""#);
        assert_eq!(quote("\u{7}"), r#""\x07""#);
        assert_eq!(quote("\u{2028}"), r#""\u2028""#);
    }

    #[test]
    fn test_key_quotes_only_when_needed() {
        assert_eq!(key("dev"), "dev");
        assert_eq!(key("42"), r#""42""#);
        assert_eq!(key("true"), r#""true""#);
    }

    #[test]
    fn test_literal_block_strip() {
        let lines = literal_block("k", "first\nsecond");
        assert_eq!(lines, ["k: |-", "  first", "  second"]);
        assert_eq!(parse_value(&lines), "first\nsecond");
    }

    #[test]
    fn test_literal_block_clip() {
        let lines = literal_block("k", "text\n");
        assert_eq!(lines[0], "k: |");
        assert_eq!(parse_value(&lines), "text\n");
    }

    #[test]
    fn test_literal_block_keep() {
        let lines = literal_block("k", "text\n\n\n");
        assert_eq!(lines[0], "k: |+");
        assert_eq!(parse_value(&lines), "text\n\n\n");
    }

    #[test]
    fn test_literal_block_blank_lines_inside() {
        let text = "para one\n\npara two";
        assert_eq!(parse_value(&literal_block("k", text)), text);
    }

    #[test]
    fn test_literal_block_leading_space() {
        let lines = literal_block("k", "  indented\nnext");
        assert_eq!(lines[0], "k: |2-");
        assert_eq!(parse_value(&lines), "  indented\nnext");
    }

    #[test]
    fn test_literal_block_markdown_specials() {
        let text = "# Heading\n- item: one\n> quote \"x\"";
        assert_eq!(parse_value(&literal_block("k", text)), text);
    }

    #[test]
    fn test_literal_block_falls_back_to_quote() {
        assert_eq!(literal_block("k", ""), [r#"k: """#]);
        assert_eq!(literal_block("k", "\n"), [r#"k: "\n""#]);
        assert_eq!(literal_block("k", "a\r\nb"), [r#"k: "a\r\nb""#]);
    }

    proptest! {
        #[test]
        fn quoted_scalars_parse_back(s in any::<String>()) {
            let parsed: String = serde_yaml::from_str(&quote(&s)).unwrap();
            prop_assert_eq!(parsed, s);
        }

        #[test]
        fn plain_safe_keys_parse_back_as_strings(s in "[A-Za-z_][A-Za-z0-9_.-]{0,12}") {
            let doc = format!("{}: x\n", key(&s));
            let map: serde_yaml::Mapping = serde_yaml::from_str(&doc).unwrap();
            let (parsed, _) = map.iter().next().unwrap();
            prop_assert_eq!(parsed.as_str(), Some(s.as_str()));
        }
    }
}
