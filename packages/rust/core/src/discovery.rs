//! Tutorial discovery.
//!
//! Walks the content root and builds the in-memory [`Tutorial`] / [`Lesson`]
//! model. Layout:
//!
//! ```text
//! <root>/
//! ├── 1-wallet-basics/
//! │   ├── meta.md
//! │   ├── 1-setup/
//! │   │   ├── content.md
//! │   │   └── _solution/
//! │   │       └── index.js
//! │   └── 2-balances/
//! │       └── content.md
//! └── 2-transactions/
//!     └── ...
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use tutorial_llms_markdown::extract_title;
use tutorial_llms_shared::{ContentLayout, Lesson, Result, Tutorial, TutorialLlmsError};

/// Title used when a metadata document has no `title:` field.
pub const UNTITLED: &str = "Untitled";

/// Leading ordering prefix (`12-`). ASCII digits only.
static ORDER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)-").expect("order prefix regex")
});

/// Discover every tutorial under the content root.
///
/// A tutorial whose metadata document (or any lesson document) cannot be read
/// is skipped with a warning, as is a tutorial whose slug repeats an earlier
/// one. An unreadable content root is an error.
///
/// Tutorials come back sorted by directory path; lessons by number.
#[instrument(skip_all, fields(root = %layout.root.display()))]
pub async fn scan_tutorials(layout: &ContentLayout) -> Result<Vec<Tutorial>> {
    let candidates = named_subdirs(&layout.root).await?;

    let mut tutorials: Vec<Tutorial> = Vec::with_capacity(candidates.len());
    let mut slugs: HashSet<String> = HashSet::new();

    for dir in candidates {
        let tutorial = match scan_tutorial(layout, &dir).await {
            Ok(tutorial) => tutorial,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping tutorial");
                continue;
            }
        };

        if !slugs.insert(tutorial.slug.clone()) {
            let e = TutorialLlmsError::validation(format!("duplicate slug '{}'", tutorial.slug));
            warn!(dir = %dir.display(), error = %e, "skipping tutorial");
            continue;
        }

        debug!(
            slug = %tutorial.slug,
            lessons = tutorial.lessons.len(),
            "discovered tutorial"
        );
        tutorials.push(tutorial);
    }

    tutorials.sort_by(|a, b| a.dir.cmp(&b.dir));

    info!(count = tutorials.len(), "tutorial discovery complete");
    Ok(tutorials)
}

/// Slug for a tutorial directory name: the name with its ordering prefix removed.
pub fn tutorial_slug(dir_name: &str) -> String {
    ORDER_PREFIX_RE.replace(dir_name, "").into_owned()
}

/// Lesson number from a directory name, `0` when there is no numeric prefix.
/// A prefix too large for `u64` saturates, so it still sorts last.
pub fn lesson_number(dir_name: &str) -> u64 {
    ORDER_PREFIX_RE
        .captures(dir_name)
        .map(|caps| caps[1].parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Non-hidden regular files directly inside `dir`, sorted by path.
pub(crate) async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| TutorialLlmsError::io(dir, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| TutorialLlmsError::io(dir, e))?
    {
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        // Follows symlinks, like the directory scan.
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn scan_tutorial(layout: &ContentLayout, dir: &Path) -> Result<Tutorial> {
    let meta_path = dir.join(&layout.meta_file);
    let meta = read_text(&meta_path).await?;
    let title = extract_title(&meta).unwrap_or_else(|| UNTITLED.to_string());

    let slug = tutorial_slug(&dir_name(dir));

    let mut lessons = Vec::new();
    for lesson_dir in named_subdirs(dir).await? {
        lessons.push(scan_lesson(layout, &lesson_dir).await?);
    }

    // Stable: equal numbers keep path order.
    lessons.sort_by_key(|lesson| lesson.number);

    Ok(Tutorial {
        slug,
        title,
        dir: dir.to_path_buf(),
        lessons,
    })
}

async fn scan_lesson(layout: &ContentLayout, dir: &Path) -> Result<Lesson> {
    let name = dir_name(dir);
    let content_path = dir.join(&layout.content_file);
    let content = read_text(&content_path).await?;

    let title = extract_title(&content).unwrap_or_else(|| name.clone());
    let solution_dir = non_empty_solution_dir(&dir.join(&layout.solution_dir)).await?;

    Ok(Lesson {
        number: lesson_number(&name),
        title,
        content_path,
        solution_dir,
    })
}

/// `Some(dir)` only if `dir` is a directory holding at least one file.
async fn non_empty_solution_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let is_dir = tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Ok(None);
    }

    let files = list_files(dir).await?;
    Ok((!files.is_empty()).then(|| dir.to_path_buf()))
}

/// Subdirectories of `dir` named `<something>-<something>`, sorted by path.
async fn named_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| TutorialLlmsError::io(dir, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| TutorialLlmsError::io(dir, e))?
    {
        let path = entry.path();
        let follows_convention = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| !n.starts_with('.') && n.contains('-'));
        if !follows_convention {
            continue;
        }

        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Read a file as text. Invalid UTF-8 is replaced with U+FFFD rather than
/// failing, so binary assets next to sources still render.
pub(crate) async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| TutorialLlmsError::io(path, e))?;
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
