//! FileSystem Actor
//!
//! Watches the source file and sends debounced render requests to the
//! PreviewActor.
//!
//! Architecture:
//! ```text
//! Watcher (parent dir) → Debouncer (target filter + timing) → PreviewMsg
//! ```
//!
//! The parent directory is watched instead of the file itself: editors that
//! save by writing a temp file and renaming it over the original replace the
//! inode, which a direct file watch would lose.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::messages::{PreviewMsg, RenderReason};
use crate::utils::path::normalize_file_path;

// Pure timing and target filtering.
mod debouncer;
// Shared fs event types.
mod types;

#[cfg(test)]
mod tests;

use debouncer::Debouncer;

/// FileSystem Actor - watches the source file for changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Channel to send messages to PreviewActor
    preview_tx: mpsc::Sender<PreviewMsg>,
    /// Debouncer state
    debouncer: Debouncer,
}

impl FsActor {
    /// Create a new FsActor and start watching immediately.
    ///
    /// Events arriving before `run()` are buffered in the notify channel.
    pub fn new(
        file: &Path,
        debounce: Duration,
        preview_tx: mpsc::Sender<PreviewMsg>,
    ) -> notify::Result<Self> {
        let target = normalize_file_path(file);
        let dir = watch_dir(&target);

        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        crate::debug!("watch"; "watching {}", dir.display());

        Ok(Self {
            notify_rx,
            watcher,
            preview_tx,
            debouncer: Debouncer::new(target, debounce),
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        // Extract fields before consuming self
        let notify_rx = self.notify_rx;
        let preview_tx = self.preview_tx;
        let mut debouncer = self.debouncer;
        let _watcher = self.watcher;

        let (async_tx, mut async_rx) = tokio::sync::mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => {
                    let Some(event) = event else { break };
                    debouncer.add_event(&event);
                }
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    if flush(&mut debouncer, &preview_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Send a render request once the debouncer is ready.
///
/// Returns `Err(())` if PreviewActor shut down
async fn flush(debouncer: &mut Debouncer, preview_tx: &mpsc::Sender<PreviewMsg>) -> Result<(), ()> {
    let Some(kind) = debouncer.take_if_ready() else {
        return Ok(());
    };

    crate::debug!("watch"; "source {}", kind.label());
    preview_tx
        .send(PreviewMsg::Render {
            reason: RenderReason::FileChanged,
        })
        .await
        .map_err(|_| ())
}

/// Directory to watch for `target`.
fn watch_dir(target: &Path) -> PathBuf {
    target
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
