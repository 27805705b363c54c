//! Host build-tool adapter.
//!
//! The host (a static-site build or its dev server) calls into the generator
//! through exactly two entry points:
//!
//! - [`HostHooks::on_build_finished`]: a full build completed; generate into
//!   its output directory now and fail the build on error.
//! - [`HostHooks::on_file_changed`]: a watched file changed; regenerate into
//!   the dev output directory if the path is tutorial content. Failures are
//!   logged and the previous outputs stay in place.
//!
//! Change-triggered runs go through a [`Regenerator`], so bursts coalesce
//! instead of racing on the output files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use tutorial_llms_shared::{GenerateConfig, GenerateReport, Result, TutorialLlmsError};

use crate::flight::{Flight, GenerateJob, Regenerator};
use crate::pipeline::{ProgressReporter, generate_all};

/// What a file-change notification led to.
#[derive(Debug)]
pub enum ChangeOutcome {
    /// Not tutorial content; nothing ran.
    Ignored,
    /// A run already in flight will pick the change up.
    Coalesced,
    /// Outputs regenerated.
    Regenerated(GenerateReport),
    /// Regeneration failed; previous outputs are unchanged.
    Failed(TutorialLlmsError),
}

/// Entry points for the host build tool. Cheap to clone; clones share the
/// same single-flight guard.
#[derive(Clone)]
pub struct HostHooks {
    config: GenerateConfig,
    content_roots: Vec<PathBuf>,
    dev: Arc<Regenerator<GenerateJob>>,
}

impl HostHooks {
    /// `config.output_dir` is the dev output directory used by change-triggered runs.
    pub fn new(config: GenerateConfig) -> Self {
        let content_roots = root_variants(&config.layout.root);
        let dev = Arc::new(Regenerator::new(GenerateJob {
            config: config.clone(),
        }));

        Self {
            config,
            content_roots,
            dev,
        }
    }

    /// Generate into `output_dir` once, now. Errors propagate to the caller.
    #[instrument(skip_all, fields(output_dir = %output_dir.display()))]
    pub async fn on_build_finished(
        &self,
        output_dir: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<GenerateReport> {
        info!("build finished, generating llms.txt files");
        let config = self.config.with_output_dir(output_dir);
        generate_all(&config, progress).await
    }

    /// Regenerate into the dev output directory if `path` is tutorial content.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn on_file_changed(&self, path: &Path) -> ChangeOutcome {
        if !self.is_relevant(path) {
            debug!("ignoring change outside tutorial content");
            return ChangeOutcome::Ignored;
        }

        info!("tutorial content changed, regenerating");
        match self.dev.request().await {
            Flight::Ran {
                result: Ok(report),
                runs,
            } => {
                info!(
                    tutorials = report.tutorial_count,
                    runs, "regenerated llms.txt files"
                );
                ChangeOutcome::Regenerated(report)
            }
            Flight::Ran { result: Err(e), .. } => {
                error!(error = %e, "regeneration failed, keeping previous outputs");
                ChangeOutcome::Failed(e)
            }
            Flight::Coalesced => ChangeOutcome::Coalesced,
        }
    }

    /// Whether a change to `path` should trigger regeneration: it lies under
    /// the content root and is either a content document (by extension) or
    /// inside a solution directory.
    pub fn is_relevant(&self, path: &Path) -> bool {
        let candidates = [path.to_path_buf(), absolute(path)];
        let under_root = candidates
            .iter()
            .any(|p| self.content_roots.iter().any(|root| p.starts_with(root)));
        if !under_root {
            return false;
        }

        let layout = &self.config.layout;
        let is_document = match (path.extension(), layout.content_extension()) {
            (Some(ext), Some(expected)) => ext == expected,
            _ => false,
        };
        let in_solution = path
            .components()
            .any(|c| c.as_os_str() == layout.solution_dir.as_str());

        is_document || in_solution
    }
}

/// The content root as configured, made absolute, and canonicalized (when it
/// exists), so watcher paths match whichever form they arrive in.
fn root_variants(root: &Path) -> Vec<PathBuf> {
    let mut roots = vec![root.to_path_buf()];
    let abs = absolute(root);
    if !roots.contains(&abs) {
        roots.push(abs);
    }
    if let Ok(canonical) = std::fs::canonicalize(root) {
        if !roots.contains(&canonical) {
            roots.push(canonical);
        }
    }
    roots
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
