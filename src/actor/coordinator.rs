//! Actor Coordinator - Wires up the Live Preview Actor System
//!
//! # Responsibility
//!
//! The Coordinator is a **thin orchestrator** that:
//! - Creates communication channels
//! - Wires up actors
//! - Runs them concurrently
//!
//! It does NOT contain business logic - that lives in `preview/`.
//!
//! # Architecture
//!
//! ```text
//! FsActor --> PreviewActor --> WsActor
//!                  ^              |
//!                  +---[ready]----+
//! ```

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::{PreviewMsg, RenderReason, WsMsg};
use super::preview::PreviewActor;
use super::ws::WsActor;
use crate::config::PreviewConfig;
use crate::markdown::MarkdownOptions;
use crate::preview::Previewer;
use crate::reload::origin::AllowedOrigin;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// Poll interval for the shutdown signal
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    config: Arc<PreviewConfig>,
    file: PathBuf,
    /// Address the preview page is served from
    page_addr: SocketAddr,
    ws_listener: Option<TcpListener>,
    /// Optional shutdown signal receiver
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create a coordinator previewing `file` for the page at `page_addr`
    pub fn new(config: Arc<PreviewConfig>, file: PathBuf, page_addr: SocketAddr) -> Self {
        Self {
            config,
            file,
            page_addr,
            ws_listener: None,
            shutdown_rx: None,
        }
    }

    /// Accept WebSocket clients from an already bound listener
    pub fn with_ws_listener(mut self, listener: TcpListener) -> Self {
        self.ws_listener = Some(listener);
        self
    }

    /// Set shutdown signal receiver
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(mut self) -> Result<()> {
        // Create channels
        let (preview_tx, preview_rx) = mpsc::channel::<PreviewMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        if let Some(listener) = self.ws_listener.take() {
            crate::reload::server::spawn_acceptor(listener, ws_tx.clone())?;
        }

        // Watcher first, so no change after the initial render is missed
        let fs_actor = FsActor::new(&self.file, self.config.watch.debounce(), preview_tx.clone())
            .with_context(|| format!("failed to watch {}", self.file.display()))?;

        let previewer = Previewer::new(&self.file, MarkdownOptions::from(&self.config.markdown));
        let preview_actor = PreviewActor::new(preview_rx, ws_tx.clone(), previewer);
        let ws_actor = WsActor::new(ws_rx, preview_tx.clone(), AllowedOrigin::for_page(self.page_addr));

        // Render once up front so the status line and late clients have content
        preview_tx
            .send(PreviewMsg::Render {
                reason: RenderReason::Startup,
            })
            .await
            .context("preview actor unavailable")?;

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        run_actors(fs_actor, preview_actor, ws_actor, preview_tx, ws_tx, shutdown_rx).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// Run all actors concurrently
async fn run_actors(
    fs: FsActor,
    preview: PreviewActor,
    ws: WsActor,
    preview_tx: mpsc::Sender<PreviewMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let preview_handle = tokio::spawn(async move { preview.run().await });
    let ws_handle = tokio::spawn(async move { ws.run().await });
    let fs_handle = tokio::spawn(async move { fs.run().await });

    // Wait for shutdown signal (poll-based since crossbeam channel)
    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
    } else {
        // No shutdown signal, run until the watcher stops
        let _ = fs_handle.await;
    }

    // Let the in-flight render finish, then close client connections
    let _ = preview_tx.send(PreviewMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), preview_handle).await;
    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
}
