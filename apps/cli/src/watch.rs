//! `watch` command: regenerate on tutorial content changes.

use color_eyre::eyre::Result;
use notify::{EventKind, RecursiveMode, Watcher};
use tracing::{error, info, warn};
use tutorial_llms_core::hooks::HostHooks;
use tutorial_llms_core::pipeline::SilentProgress;
use tutorial_llms_shared::{GenerateConfig, TutorialLlmsError};

/// Generate once, then feed every content event to the change hook until Ctrl-C.
pub(crate) async fn run(config: GenerateConfig) -> Result<()> {
    let root = config.layout.root.clone();
    let output_dir = config.output_dir.clone();
    let hooks = HostHooks::new(config);

    // Initial pass, same as a finished build; failures only get logged here.
    if let Err(e) = hooks.on_build_finished(&output_dir, &SilentProgress).await {
        error!(error = %e, "initial generation failed");
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = tx.send(res);
    })
    .map_err(|e| TutorialLlmsError::Watch(e.to_string()))?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| TutorialLlmsError::Watch(format!("{}: {e}", root.display())))?;

    info!(root = %root.display(), out = %output_dir.display(), "watching tutorial content");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("stopping watcher");
                break;
            }
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    Ok(event) if is_content_event(&event.kind) => {
                        // One task per path; the hooks' single-flight guard coalesces bursts.
                        for path in event.paths {
                            let hooks = hooks.clone();
                            tokio::spawn(async move {
                                hooks.on_file_changed(&path).await;
                            });
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "watch error"),
                }
            }
        }
    }

    Ok(())
}

/// Create, modify and remove events can change rendered output; access events cannot.
fn is_content_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
