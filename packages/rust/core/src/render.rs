//! Text rendering for tutorials, the root index and the full dump.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use tutorial_llms_markdown::{code_block, strip_frontmatter};
use tutorial_llms_shared::{FULL_DUMP_FILE, Result, TUTORIAL_OUTPUT_DIR, Tutorial, TutorialLlmsError};

use crate::discovery::{list_files, read_text};

/// Width of the `=` rule between tutorials in the full dump.
pub const DIVIDER_WIDTH: usize = 80;

/// Separator placed between tutorial blobs in `llms-full.txt`.
pub fn full_dump_separator() -> String {
    format!("\n\n{}\n\n", "=".repeat(DIVIDER_WIDTH))
}

/// Render one tutorial: title, then every lesson with its body and solution code.
///
/// Lesson bodies and solution files are embedded verbatim (front matter aside);
/// invalid UTF-8 shows up as U+FFFD. Any unreadable file fails the whole render.
#[instrument(skip_all, fields(slug = %tutorial.slug, lessons = tutorial.lessons.len()))]
pub async fn render_tutorial(tutorial: &Tutorial) -> Result<String> {
    let mut out = format!("# {}\n\n", tutorial.title);

    for lesson in &tutorial.lessons {
        out.push_str(&format!("## Lesson {}: {}\n\n", lesson.number, lesson.title));

        let content = read_text(&lesson.content_path).await?;
        out.push_str(strip_frontmatter(&content));
        out.push_str("\n\n");

        if let Some(solution_dir) = &lesson.solution_dir {
            out.push_str("### Solution Code\n\n");
            for (path, contents) in read_solution_files(solution_dir).await? {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                out.push_str(&code_block(&file_name, &contents));
            }
        }

        out.push_str("---\n\n");
    }

    debug!(bytes = out.len(), "rendered tutorial");
    Ok(out)
}

/// Render the `llms.txt` root index.
pub fn render_index(tutorials: &[Tutorial], site_title: &str, site_description: &str) -> String {
    let mut out = format!("# {site_title}\n\n{site_description}\n\n## Available Tutorials\n\n");

    for tutorial in tutorials {
        out.push_str(&format!(
            "- [{title}](/{TUTORIAL_OUTPUT_DIR}/{file}): {title}\n",
            title = tutorial.title,
            file = tutorial.output_file_name(),
        ));
    }

    out.push_str("\n## Complete Documentation\n\n");
    out.push_str(&format!(
        "- [All Tutorials](/{FULL_DUMP_FILE}): Full combined documentation\n"
    ));

    out
}

/// Join rendered tutorials into the `llms-full.txt` dump.
pub fn render_full_dump(blobs: &[String]) -> String {
    blobs.join(&full_dump_separator())
}

/// Read every solution file concurrently; results come back sorted by path.
async fn read_solution_files(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let files = list_files(dir).await?;

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            tokio::spawn(async move {
                let contents = read_text(&path).await?;
                Ok::<_, TutorialLlmsError>((path, contents))
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let read = handle
            .await
            .map_err(|e| TutorialLlmsError::Task(e.to_string()))??;
        results.push(read);
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::scan_tutorials;
    use crate::testing::ContentTree;
    use tutorial_llms_shared::Lesson;

    #[tokio::test]
    async fn renders_lessons_in_number_order() {
        let tree = ContentTree::new();
        tree.tutorial("1-t", Some("title: Ordered"));
        tree.lesson("1-t", "3-c", "---\ntitle: Three\n---\nthird body\n");
        tree.lesson("1-t", "1-a", "---\ntitle: One\n---\nfirst body\n");
        tree.lesson("1-t", "2-b", "---\ntitle: Two\n---\nsecond body\n");

        let tutorials = scan_tutorials(&tree.layout()).await.unwrap();
        let text = render_tutorial(&tutorials[0]).await.unwrap();

        let one = text.find("## Lesson 1: One").unwrap();
        let two = text.find("## Lesson 2: Two").unwrap();
        let three = text.find("## Lesson 3: Three").unwrap();
        assert!(one < two && two < three);
    }

    #[tokio::test]
    async fn exact_layout_with_solution() {
        let tree = ContentTree::new();
        tree.tutorial("1-wallets", Some("title: Wallets"));
        tree.lesson("1-wallets", "1-setup", "---\ntitle: Setup\n---\nCreate a wallet.\n");
        tree.solution_file("1-wallets", "1-setup", "index.js", "createWallet()");

        let tutorials = scan_tutorials(&tree.layout()).await.unwrap();
        let text = render_tutorial(&tutorials[0]).await.unwrap();

        assert_eq!(
            text,
            "# Wallets\n\n\
             ## Lesson 1: Setup\n\n\
             Create a wallet.\n\n\n\
             ### Solution Code\n\n\
             #### index.js\n```js\ncreateWallet()\n```\n\n\
             ---\n\n"
        );
    }

    #[tokio::test]
    async fn empty_solution_dir_has_no_heading() {
        let tree = ContentTree::new();
        tree.tutorial("1-t", Some("title: T"));
        tree.lesson("1-t", "1-a", "title: A\n");
        std::fs::create_dir_all(tree.root().join("1-t/1-a/_solution")).unwrap();

        let tutorials = scan_tutorials(&tree.layout()).await.unwrap();
        let text = render_tutorial(&tutorials[0]).await.unwrap();
        assert!(!text.contains("Solution Code"));
    }

    #[tokio::test]
    async fn solution_files_sorted_by_name() {
        let tree = ContentTree::new();
        tree.tutorial("1-t", Some("title: T"));
        tree.lesson("1-t", "1-a", "title: A\n");
        tree.solution_file("1-t", "1-a", "wallet.ts", "w");
        tree.solution_file("1-t", "1-a", "index.js", "i");
        tree.solution_file("1-t", "1-a", "config.json", "c");

        let tutorials = scan_tutorials(&tree.layout()).await.unwrap();
        let text = render_tutorial(&tutorials[0]).await.unwrap();

        let config = text.find("#### config.json\n```json").unwrap();
        let index = text.find("#### index.js\n```js").unwrap();
        let wallet = text.find("#### wallet.ts\n```ts").unwrap();
        assert!(config < index && index < wallet);
    }

    #[tokio::test]
    async fn binary_solution_file_is_embedded() {
        let tree = ContentTree::new();
        tree.tutorial("1-t", Some("title: T"));
        tree.lesson("1-t", "1-a", "title: A\n");
        tree.solution_file("1-t", "1-a", "index.js", "run()");
        std::fs::write(
            tree.root().join("1-t/1-a/_solution/logo.png"),
            [0x89, b'P', b'N', b'G', 0xff],
        )
        .unwrap();

        let tutorials = scan_tutorials(&tree.layout()).await.unwrap();
        let text = render_tutorial(&tutorials[0]).await.unwrap();

        assert!(text.contains("#### index.js\n```js\nrun()\n```"));
        assert!(text.contains("#### logo.png\n```png\n\u{FFFD}PNG\u{FFFD}\n```"));
    }

    #[tokio::test]
    async fn body_without_frontmatter_is_embedded_unchanged() {
        let tree = ContentTree::new();
        tree.tutorial("1-t", Some("title: T"));
        tree.lesson("1-t", "1-plain", "Plain body, <b>raw</b> `code`.");

        let tutorials = scan_tutorials(&tree.layout()).await.unwrap();
        let text = render_tutorial(&tutorials[0]).await.unwrap();
        assert!(text.contains("## Lesson 1: 1-plain\n\nPlain body, <b>raw</b> `code`.\n\n---\n\n"));
    }

    #[tokio::test]
    async fn unreadable_content_fails_render() {
        let tutorial = Tutorial {
            slug: "gone".into(),
            title: "Gone".into(),
            dir: PathBuf::from("/nonexistent"),
            lessons: vec![Lesson {
                number: 1,
                title: "Missing".into(),
                content_path: PathBuf::from("/nonexistent/1-missing/content.md"),
                solution_dir: None,
            }],
        };

        let err = render_tutorial(&tutorial).await.unwrap_err();
        assert!(matches!(err, TutorialLlmsError::Io { .. }));
    }

    #[test]
    fn index_layout() {
        let tutorials = vec![
            Tutorial {
                slug: "basics".into(),
                title: "Basics".into(),
                dir: PathBuf::from("c/1-basics"),
                lessons: vec![],
            },
            Tutorial {
                slug: "gasless".into(),
                title: "Gasless Transfers".into(),
                dir: PathBuf::from("c/2-gasless"),
                lessons: vec![],
            },
        ];

        let index = render_index(&tutorials, "Site", "About the site.");
        assert_eq!(
            index,
            "# Site\n\nAbout the site.\n\n## Available Tutorials\n\n\
             - [Basics](/tutorial/basics.txt): Basics\n\
             - [Gasless Transfers](/tutorial/gasless.txt): Gasless Transfers\n\
             \n## Complete Documentation\n\n\
             - [All Tutorials](/llms-full.txt): Full combined documentation\n"
        );
    }

    #[test]
    fn full_dump_splits_back_into_blobs() {
        let a = "# A\n\nalpha\n".to_string();
        let b = "# B\n\nbeta\n".to_string();
        let full = render_full_dump(&[a.clone(), b.clone()]);

        assert_eq!(full, format!("{a}\n\n{}\n\n{b}", "=".repeat(80)));

        let parts: Vec<&str> = full.split(&full_dump_separator()).collect();
        assert_eq!(parts, [a.as_str(), b.as_str()]);
    }

    #[test]
    fn full_dump_of_nothing_is_empty() {
        assert_eq!(render_full_dump(&[]), "");
    }
}
