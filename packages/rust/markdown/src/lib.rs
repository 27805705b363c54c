//! Markdown helpers for tutorial aggregation.
//!
//! Front-matter stripping and title extraction for content documents, plus
//! the fenced-code-block rendering used for solution files.

mod frontmatter;

pub use frontmatter::{extract_title, strip_frontmatter};

/// Language label for a fenced block: the text after the last `.` of the
/// file name, or the whole name when it has no dot.
pub fn fence_label(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

/// Render one solution file as a `####` heading followed by a fenced block.
///
/// File contents are embedded verbatim; no escaping is applied.
pub fn code_block(file_name: &str, contents: &str) -> String {
    format!(
        "#### {file_name}\n```{}\n{contents}\n```\n\n",
        fence_label(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_label_from_extension() {
        assert_eq!(fence_label("index.js"), "js");
        assert_eq!(fence_label("wallet.test.ts"), "ts");
    }

    #[test]
    fn fence_label_without_dot_is_whole_name() {
        assert_eq!(fence_label("Dockerfile"), "Dockerfile");
    }

    #[test]
    fn fence_label_after_trailing_dot_is_empty() {
        assert_eq!(fence_label("config."), "");
    }

    #[test]
    fn code_block_layout() {
        let block = code_block("index.js", "console.log('hi')");
        assert_eq!(
            block,
            "#### index.js\n```js\nconsole.log('hi')\n```\n\n"
        );
    }
}
