//! Shared types, error model, and configuration for tutorial-llms.
//!
//! This crate is the foundation depended on by all other tutorial-llms crates.
//! It provides:
//! - [`TutorialLlmsError`] — the unified error type
//! - Domain types ([`Tutorial`], [`Lesson`], [`ArtifactMeta`], [`GenerateReport`])
//! - Configuration ([`AppConfig`], [`GenerateConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ContentConfig, ContentLayout, GenerateConfig, OutputConfig,
    SiteConfig, init_config, load_config, load_config_from,
};
pub use error::{Result, TutorialLlmsError};
pub use types::{
    ArtifactMeta, FULL_DUMP_FILE, GenerateReport, INDEX_FILE, Lesson, TUTORIAL_OUTPUT_DIR,
    Tutorial,
};
