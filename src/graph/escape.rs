//! Mermaid label escaping and node ID sanitizing.
//!
//! Record identifiers and display names are free-form, while Mermaid's
//! flowchart parser wants bare node IDs and breaks on a handful of
//! characters inside labels.

/// Sanitize a record identifier into a Mermaid flowchart node ID.
///
/// # Rules
/// 1. Keep ASCII letters, digits and `_`; replace anything else with `_`
/// 2. Collapse consecutive underscores and trim them from both ends
/// 3. Suffix the reserved word `end` (any case) with `_`
/// 4. If the result is empty, use `activity_{index}`
#[must_use]
pub fn sanitize_node_id(id: &str, index: usize) -> String {
    let replaced: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let mut slug = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && slug.ends_with('_') {
            continue;
        }
        slug.push(c);
    }

    let slug = slug.trim_matches('_');

    if slug.is_empty() {
        format!("activity_{index}")
    } else if slug.eq_ignore_ascii_case("end") {
        format!("{slug}_")
    } else {
        slug.to_string()
    }
}

/// Wrap a label string in double quotes for safe Mermaid rendering.
///
/// Escapes internal double quotes by replacing `"` with `#quot;`
/// (Mermaid's HTML entity escape syntax).
#[must_use]
pub fn quote_label(label: &str) -> String {
    let escaped = label.replace('"', "#quot;");
    format!("\"{escaped}\"")
}

/// Escape special characters in Mermaid text content.
///
/// Replaces characters that break Mermaid parsing (`#`, `&`, `<`, `>`)
/// with their Mermaid-safe HTML entity equivalents. Line breaks become
/// `<br/>`, which Mermaid renders inside labels.
#[must_use]
pub fn escape_mermaid_chars(text: &str) -> String {
    text.replace('#', "#35;")
        .replace('&', "#amp;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
        .replace("\r\n", "<br/>")
        .replace(['\n', '\r'], "<br/>")
}

/// Escape then quote a display name for use as a node label.
#[must_use]
pub fn node_label(name: &str) -> String {
    quote_label(&escape_mermaid_chars(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_simple() {
        assert_eq!(sanitize_node_id("requirements", 0), "requirements");
        assert_eq!(sanitize_node_id("B", 0), "B");
    }

    #[test]
    fn test_sanitize_keeps_case() {
        assert_eq!(sanitize_node_id("SprintReview", 0), "SprintReview");
    }

    #[test]
    fn test_sanitize_dashes_and_spaces() {
        assert_eq!(sanitize_node_id("sprint-review", 0), "sprint_review");
        assert_eq!(sanitize_node_id("sprint review", 0), "sprint_review");
    }

    #[test]
    fn test_sanitize_consecutive_and_edges() {
        assert_eq!(sanitize_node_id("-a--b  c-", 0), "a_b_c");
    }

    #[test]
    fn test_sanitize_reserved_end() {
        assert_eq!(sanitize_node_id("end", 0), "end_");
        assert_eq!(sanitize_node_id("END", 0), "END_");
    }

    #[test]
    fn test_sanitize_empty_fallback() {
        assert_eq!(sanitize_node_id("", 2), "activity_2");
        assert_eq!(sanitize_node_id("!!!", 3), "activity_3");
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_node_id("análise", 0), "an_lise");
    }

    #[test]
    fn test_quote_label_with_quotes() {
        assert_eq!(quote_label(r#"say "hi""#), r#""say #quot;hi#quot;""#);
    }

    #[test]
    fn test_escape_mermaid_chars() {
        assert_eq!(
            escape_mermaid_chars("R&D <draft> #1"),
            "R#amp;D #lt;draft#gt; #35;1"
        );
    }

    #[test]
    fn test_line_breaks_become_br() {
        assert_eq!(escape_mermaid_chars("Daily\nstand-up"), "Daily<br/>stand-up");
        assert_eq!(escape_mermaid_chars("a\r\nb\rc"), "a<br/>b<br/>c");
        assert_eq!(node_label("<x>\ny"), r##""#lt;x#gt;<br/>y""##);
    }

    #[test]
    fn test_node_label_escapes_before_quoting() {
        // the `#` introduced by `#quot;` must not be escaped again
        assert_eq!(node_label(r#"A "B" #2"#), r#""A #quot;B#quot; #35;2""#);
    }
}
