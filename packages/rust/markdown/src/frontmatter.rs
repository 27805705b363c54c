//! Front-matter handling for lesson and tutorial documents.
//!
//! Titles are matched line-wise anywhere in the document, not only inside the
//! `---` block, so loosely formatted metadata files still resolve a title.

use std::sync::LazyLock;

use regex::Regex;

/// Leading `---\n ... \n---\n` block, anchored to the start of the document.
static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---\n(?s:.*?)\n---\n").expect("front matter regex")
});

/// First `title:` field. `\s*` may cross a line break; the value may not,
/// and `\r` counts as a line break.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"title:\s*([^\r\n\u{2028}\u{2029}]+)").expect("title regex")
});

/// Remove a leading front-matter block. Documents without one are returned unchanged.
pub fn strip_frontmatter(doc: &str) -> &str {
    match FRONTMATTER_RE.find(doc) {
        Some(m) => &doc[m.end()..],
        None => doc,
    }
}

/// Extract the trimmed value of the first `title:` field, if any.
pub fn extract_title(doc: &str) -> Option<String> {
    TITLE_RE
        .captures(doc)
        .map(|caps| caps[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_block() {
        let doc = "---\ntype: lesson\ntitle: Wallet Setup\n---\n# Intro\n\nBody.\n";
        assert_eq!(strip_frontmatter(doc), "# Intro\n\nBody.\n");
    }

    #[test]
    fn leaves_document_without_block_unchanged() {
        let doc = "# Intro\n\nNo metadata here.\n";
        assert_eq!(strip_frontmatter(doc), doc);
    }

    #[test]
    fn only_strips_at_document_start() {
        let doc = "Intro\n---\ntitle: x\n---\nrest";
        assert_eq!(strip_frontmatter(doc), doc);
    }

    #[test]
    fn strips_only_first_block() {
        let doc = "---\ntitle: A\n---\nbody\n---\nmore\n---\ntail";
        assert_eq!(strip_frontmatter(doc), "body\n---\nmore\n---\ntail");
    }

    #[test]
    fn unterminated_block_is_kept() {
        let doc = "---\ntitle: A\nbody without closing fence";
        assert_eq!(strip_frontmatter(doc), doc);
    }

    #[test]
    fn extracts_and_trims_title() {
        let doc = "---\ntype: chapter\ntitle:   Sending POL  \n---\n";
        assert_eq!(extract_title(doc).as_deref(), Some("Sending POL"));
    }

    #[test]
    fn first_title_wins() {
        let doc = "---\ntitle: First\n---\n\ntitle: Second\n";
        assert_eq!(extract_title(doc).as_deref(), Some("First"));
    }

    #[test]
    fn missing_title_is_none() {
        assert_eq!(extract_title("---\ntype: part\n---\n"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn bare_title_key_before_carriage_return_is_none() {
        assert_eq!(extract_title("type: part\ntitle:\r"), None);
        assert_eq!(extract_title("title:\r\n"), None);
    }

    #[test]
    fn title_value_stops_at_carriage_return() {
        assert_eq!(extract_title("title:\rNext").as_deref(), Some("Next"));
        assert_eq!(extract_title("title: A\rB").as_deref(), Some("A"));
    }

    #[test]
    fn crlf_title_is_trimmed() {
        let doc = "---\r\ntitle: Windows Line Endings\r\n---\r\n";
        assert_eq!(extract_title(doc).as_deref(), Some("Windows Line Endings"));
    }
}
