//! Application configuration for tutorial-llms.
//!
//! Project config lives at `./tutorial-llms.toml` next to the site sources.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorialLlmsError};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tutorial-llms.toml";

// ---------------------------------------------------------------------------
// Config structs (matching tutorial-llms.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity used in the root index.
    #[serde(default)]
    pub site: SiteConfig,

    /// Content tree layout.
    #[serde(default)]
    pub content: ContentConfig,

    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Heading of `llms.txt`.
    #[serde(default = "default_site_title")]
    pub title: String,

    /// Line under the heading of `llms.txt`.
    #[serde(default = "default_site_description")]
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: default_site_description(),
        }
    }
}

fn default_site_title() -> String {
    "Nimiq Tutorials".into()
}
fn default_site_description() -> String {
    "Learn to build on Nimiq blockchain through interactive tutorials.".into()
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding one subdirectory per tutorial.
    #[serde(default = "default_content_root")]
    pub root: String,

    /// Per-tutorial metadata document.
    #[serde(default = "default_meta_file")]
    pub meta_file: String,

    /// Per-lesson content document.
    #[serde(default = "default_content_file")]
    pub content_file: String,

    /// Per-lesson solution directory name.
    #[serde(default = "default_solution_dir")]
    pub solution_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            meta_file: default_meta_file(),
            content_file: default_content_file(),
            solution_dir: default_solution_dir(),
        }
    }
}

fn default_content_root() -> String {
    "src/content/tutorial".into()
}
fn default_meta_file() -> String {
    "meta.md".into()
}
fn default_content_file() -> String {
    "content.md".into()
}
fn default_solution_dir() -> String {
    "_solution".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Site output directory (the build tool's `outDir`).
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "dist".into()
}

// ---------------------------------------------------------------------------
// Generate config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Where and how tutorial content is laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    /// Content root (`src/content/tutorial`).
    pub root: PathBuf,
    /// Metadata document name inside each tutorial directory.
    pub meta_file: String,
    /// Content document name inside each lesson directory.
    pub content_file: String,
    /// Solution directory name inside each lesson directory.
    pub solution_dir: String,
}

impl ContentLayout {
    /// Extension of the content document (`md` for `content.md`).
    pub fn content_extension(&self) -> Option<&str> {
        Path::new(&self.content_file)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self::from(&ContentConfig::default())
    }
}

impl From<&ContentConfig> for ContentLayout {
    fn from(config: &ContentConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            meta_file: config.meta_file.clone(),
            content_file: config.content_file.clone(),
            solution_dir: config.solution_dir.clone(),
        }
    }
}

/// Runtime generation configuration, passed explicitly into every run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Content tree layout.
    pub layout: ContentLayout,
    /// Output directory receiving `llms.txt`, `llms-full.txt` and `tutorial/`.
    pub output_dir: PathBuf,
    /// Heading of the root index.
    pub site_title: String,
    /// Description line of the root index.
    pub site_description: String,
}

impl GenerateConfig {
    /// Same configuration, writing into a different output directory.
    pub fn with_output_dir(&self, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..self.clone()
        }
    }
}

impl From<&AppConfig> for GenerateConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            layout: ContentLayout::from(&config.content),
            output_dir: PathBuf::from(&config.output.dir),
            site_title: config.site.title.clone(),
            site_description: config.site.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config.
///
/// An explicit path must exist. Without one, `./tutorial-llms.toml` is used
/// when present, otherwise defaults are returned.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).map_err(|e| TutorialLlmsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        TutorialLlmsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default config file into `dir`. Refuses to overwrite an existing one.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(TutorialLlmsError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| TutorialLlmsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TutorialLlmsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
