//! End-to-end generation: content tree → discovery → render → output files.

use std::time::Instant;

use tracing::{error, info, instrument};

use tutorial_llms_shared::{GenerateConfig, GenerateReport, Result};

use crate::assembler::{self, RenderedOutput};
use crate::discovery;
use crate::render;

/// Progress callback for reporting generation status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each tutorial has been rendered.
    fn tutorial_rendered(&self, slug: &str, current: usize, total: usize);
    /// Called when the run completes successfully.
    fn done(&self, report: &GenerateReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn tutorial_rendered(&self, _slug: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &GenerateReport) {}
}

/// Run one full generation.
///
/// 1. Discover tutorials under the content root
/// 2. Render each tutorial once (kept in memory for the full dump)
/// 3. Render the root index and the full dump
/// 4. Write `tutorial/<slug>.txt`, `llms.txt` and `llms-full.txt`
///
/// Every read happens before the first write, so a failed run leaves the
/// previous outputs in place. Failures are logged and returned.
#[instrument(skip_all, fields(
    content_root = %config.layout.root.display(),
    output_dir = %config.output_dir.display(),
))]
pub async fn generate_all(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateReport> {
    match run(config, progress).await {
        Ok(report) => {
            progress.done(&report);
            Ok(report)
        }
        Err(e) => {
            error!(error = %e, "generation failed");
            Err(e)
        }
    }
}

async fn run(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<GenerateReport> {
    let start = Instant::now();
    info!("generating llms.txt files");

    // --- Phase 1: Discovery ---
    progress.phase("Scanning tutorials");
    let tutorials = discovery::scan_tutorials(&config.layout).await?;

    // --- Phase 2: Render tutorials ---
    progress.phase("Rendering tutorials");
    let total = tutorials.len();
    let mut rendered: Vec<(String, String)> = Vec::with_capacity(total);
    for (i, tutorial) in tutorials.iter().enumerate() {
        let text = render::render_tutorial(tutorial).await?;
        progress.tutorial_rendered(&tutorial.slug, i + 1, total);
        rendered.push((tutorial.output_file_name(), text));
    }

    // --- Phase 3: Index + full dump ---
    let index = render::render_index(&tutorials, &config.site_title, &config.site_description);
    let blobs: Vec<String> = rendered.iter().map(|(_, text)| text.clone()).collect();
    let full = render::render_full_dump(&blobs);

    // --- Phase 4: Write ---
    progress.phase("Writing output files");
    let output = RenderedOutput {
        tutorials: rendered,
        index,
        full,
    };
    let files = assembler::write_outputs(&config.output_dir, &output).await?;

    let report = GenerateReport {
        tutorial_count: total,
        files,
        elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    info!(
        tutorials = report.tutorial_count,
        files = report.files.len(),
        elapsed_ms = report.elapsed_ms,
        "generated tutorial files"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
