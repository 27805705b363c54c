//! Core domain types for tutorial aggregation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Subdirectory of the output dir holding one file per tutorial.
pub const TUTORIAL_OUTPUT_DIR: &str = "tutorial";

/// Root index file name.
pub const INDEX_FILE: &str = "llms.txt";

/// Combined dump file name.
pub const FULL_DUMP_FILE: &str = "llms-full.txt";

// ---------------------------------------------------------------------------
// Tutorial / Lesson
// ---------------------------------------------------------------------------

/// One discovered tutorial. Rebuilt from the filesystem on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tutorial {
    /// Directory name without its numeric prefix (`1-wallet-basics` → `wallet-basics`).
    pub slug: String,
    /// `title:` from the metadata document, or `Untitled`.
    pub title: String,
    /// Tutorial directory.
    pub dir: PathBuf,
    /// Lessons, ascending by number.
    pub lessons: Vec<Lesson>,
}

/// One ordered step within a tutorial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    /// Numeric directory prefix, `0` when absent.
    pub number: u64,
    /// `title:` from the content document, or the raw directory name.
    pub title: String,
    /// Path to the lesson's content document.
    pub content_path: PathBuf,
    /// Solution directory, present only when it holds at least one file.
    pub solution_dir: Option<PathBuf>,
}

impl Tutorial {
    /// Output file name for this tutorial (`<slug>.txt`).
    pub fn output_file_name(&self) -> String {
        format!("{}.txt", self.slug)
    }
}

// ---------------------------------------------------------------------------
// Generation output
// ---------------------------------------------------------------------------

/// Metadata for a single written output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Path relative to the output directory, `/`-separated.
    pub path: String,
    /// SHA-256 of the file contents (lowercase hex).
    pub sha256: String,
    /// File size in bytes.
    pub size_bytes: usize,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReport {
    /// Number of tutorials rendered (N).
    pub tutorial_count: usize,
    /// Every file written: N tutorial files, the index and the full dump.
    pub files: Vec<ArtifactMeta>,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}
