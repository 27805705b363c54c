//! Test fixtures: throwaway content trees on disk.

use std::path::{Path, PathBuf};

use tutorial_llms_shared::{ContentLayout, GenerateConfig};

/// Fresh, empty directory under the system temp dir.
pub(crate) fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tl-core-test-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A content root plus a sibling output dir, removed on drop.
pub(crate) struct ContentTree {
    base: PathBuf,
}

impl ContentTree {
    pub(crate) fn new() -> Self {
        let base = temp_dir();
        std::fs::create_dir_all(base.join("content")).unwrap();
        Self { base }
    }

    pub(crate) fn root(&self) -> PathBuf {
        self.base.join("content")
    }

    pub(crate) fn out_dir(&self) -> PathBuf {
        self.base.join("dist")
    }

    pub(crate) fn layout(&self) -> ContentLayout {
        ContentLayout {
            root: self.root(),
            ..ContentLayout::default()
        }
    }

    pub(crate) fn config(&self) -> GenerateConfig {
        GenerateConfig {
            layout: self.layout(),
            output_dir: self.out_dir(),
            site_title: "Test Tutorials".into(),
            site_description: "Tutorials for tests.".into(),
        }
    }

    /// Create a tutorial directory; `None` leaves out `meta.md`.
    pub(crate) fn tutorial(&self, dir: &str, meta: Option<&str>) {
        let path = self.root().join(dir);
        std::fs::create_dir_all(&path).unwrap();
        if let Some(meta) = meta {
            std::fs::write(path.join("meta.md"), format!("---\ntype: part\n{meta}\n---\n"))
                .unwrap();
        }
    }

    pub(crate) fn lesson(&self, tutorial: &str, lesson: &str, content: &str) {
        let path = self.root().join(tutorial).join(lesson);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("content.md"), content).unwrap();
    }

    pub(crate) fn solution_file(&self, tutorial: &str, lesson: &str, name: &str, contents: &str) {
        let path = self.root().join(tutorial).join(lesson).join("_solution");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join(name), contents).unwrap();
    }

    pub(crate) fn read_output(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.out_dir().join(relative)).unwrap()
    }
}

impl Drop for ContentTree {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}
