//! Output directory assembler.
//!
//! Takes fully rendered text and writes the output layout:
//!
//! ```text
//! <output_dir>/
//! ├── llms.txt
//! ├── llms-full.txt
//! └── tutorial/
//!     ├── <slug>.txt
//!     └── ...
//! ```
//!
//! Nothing is written until every blob has been rendered. The `tutorial/`
//! directory is built in a staging directory and swapped in whole, so it
//! never mixes files from two runs and drops tutorials that no longer exist.
//! The two index files are each replaced via temp file + rename.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use tutorial_llms_shared::{
    ArtifactMeta, FULL_DUMP_FILE, INDEX_FILE, Result, TUTORIAL_OUTPUT_DIR, TutorialLlmsError,
};

/// Everything a run writes, already rendered.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    /// `(file name, contents)` per tutorial, e.g. `("wallet-basics.txt", ...)`.
    pub tutorials: Vec<(String, String)>,
    /// Contents of `llms.txt`.
    pub index: String,
    /// Contents of `llms-full.txt`.
    pub full: String,
}

/// Write all outputs into `output_dir`. Returns one [`ArtifactMeta`] per file,
/// tutorial files first, then the index and the full dump.
#[instrument(skip_all, fields(output_dir = %output_dir.display(), tutorials = output.tutorials.len()))]
pub async fn write_outputs(output_dir: &Path, output: &RenderedOutput) -> Result<Vec<ArtifactMeta>> {
    create_dir(output_dir).await?;
    remove_stale_dirs(output_dir).await?;

    let mut metas = Vec::with_capacity(output.tutorials.len() + 2);

    let staging = output_dir.join(format!(".{TUTORIAL_OUTPUT_DIR}.staging-{}", Uuid::now_v7()));
    match write_staged_tutorials(&staging, &output.tutorials).await {
        Ok(staged) => metas.extend(staged),
        Err(e) => {
            remove_dir_quietly(&staging).await;
            return Err(e);
        }
    }

    if let Err(e) = swap_dir(&staging, &output_dir.join(TUTORIAL_OUTPUT_DIR)).await {
        remove_dir_quietly(&staging).await;
        return Err(e);
    }

    metas.push(write_atomic(output_dir, INDEX_FILE, &output.index).await?);
    metas.push(write_atomic(output_dir, FULL_DUMP_FILE, &output.full).await?);

    info!(files = metas.len(), "output assembly complete");
    Ok(metas)
}

/// SHA-256 of `content` as lowercase hex.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn write_staged_tutorials(
    staging: &Path,
    tutorials: &[(String, String)],
) -> Result<Vec<ArtifactMeta>> {
    create_dir(staging).await?;

    let mut metas = Vec::with_capacity(tutorials.len());
    for (file_name, content) in tutorials {
        let path = staging.join(file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| TutorialLlmsError::io(&path, e))?;

        debug!(file = %file_name, size = content.len(), "staged tutorial file");
        metas.push(artifact_meta(&format!("{TUTORIAL_OUTPUT_DIR}/{file_name}"), content));
    }

    Ok(metas)
}

/// Replace `target` with `staging`. The previous directory is moved aside
/// first and removed after the swap.
async fn swap_dir(staging: &Path, target: &Path) -> Result<()> {
    let previous = match tokio::fs::metadata(target).await {
        Ok(_) => {
            let aside = sibling(target, &format!("old-{}", Uuid::now_v7()));
            tokio::fs::rename(target, &aside)
                .await
                .map_err(|e| TutorialLlmsError::io(target, e))?;
            Some(aside)
        }
        Err(_) => None,
    };

    if let Err(e) = tokio::fs::rename(staging, target).await {
        // Put the previous outputs back so the run leaves them intact.
        if let Some(aside) = &previous {
            if let Err(restore) = tokio::fs::rename(aside, target).await {
                error!(
                    previous = %aside.display(),
                    target = %target.display(),
                    error = %restore,
                    "failed to restore previous tutorial dir"
                );
            }
        }
        return Err(TutorialLlmsError::io(target, e));
    }

    if let Some(aside) = previous {
        if let Err(e) = tokio::fs::remove_dir_all(&aside).await {
            warn!(path = %aside.display(), error = %e, "failed to remove previous tutorial dir");
        }
    }

    debug!(path = %target.display(), "swapped in tutorial dir");
    Ok(())
}

/// Write `content` to `dir/file_name` via a temp file and rename.
async fn write_atomic(dir: &Path, file_name: &str, content: &str) -> Result<ArtifactMeta> {
    let target = dir.join(file_name);
    let temp = dir.join(format!(".{file_name}.tmp"));

    tokio::fs::write(&temp, content)
        .await
        .map_err(|e| TutorialLlmsError::io(&temp, e))?;
    tokio::fs::rename(&temp, &target)
        .await
        .map_err(|e| TutorialLlmsError::io(&target, e))?;

    debug!(file = %file_name, size = content.len(), "wrote output file");
    Ok(artifact_meta(file_name, content))
}

fn artifact_meta(path: &str, content: &str) -> ArtifactMeta {
    ArtifactMeta {
        path: path.to_string(),
        sha256: sha256_hex(content),
        size_bytes: content.len(),
    }
}

/// `<parent>/.<name>.<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{suffix}"))
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| TutorialLlmsError::io(dir, e))
}

/// Remove staging and moved-aside directories left by an interrupted run.
async fn remove_stale_dirs(output_dir: &Path) -> Result<()> {
    let prefixes = [
        format!(".{TUTORIAL_OUTPUT_DIR}.staging-"),
        format!(".{TUTORIAL_OUTPUT_DIR}.old-"),
    ];

    let mut entries = tokio::fs::read_dir(output_dir)
        .await
        .map_err(|e| TutorialLlmsError::io(output_dir, e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| TutorialLlmsError::io(output_dir, e))?
    {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            let path = entry.path();
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => debug!(path = %path.display(), "removed stale dir"),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove stale dir"),
            }
        }
    }

    Ok(())
}

async fn remove_dir_quietly(dir: &Path) {
    if tokio::fs::metadata(dir).await.is_ok() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
