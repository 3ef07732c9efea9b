//! Preview Actor - Serialized Rendering
//!
//! Owns the [`Previewer`] and processes render requests one at a time, so
//! at most one render is in flight and the baseline document is always the
//! last one successfully parsed.
//!
//! ```text
//! FsActor/WsActor --Render--> PreviewActor --ClearError + Content | Error--> WsActor
//! ```

use std::error::Error as _;

use tokio::sync::mpsc;

use super::messages::{PreviewMsg, RenderReason, WsMsg};
use crate::logger;
use crate::preview::{Preview, PreviewError, Previewer};

/// Preview Actor - renders the source file on request
pub struct PreviewActor {
    rx: mpsc::Receiver<PreviewMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    previewer: Previewer,
    /// Last render failed; the next success must clear the overlay
    has_error: bool,
}

impl PreviewActor {
    pub fn new(
        rx: mpsc::Receiver<PreviewMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        previewer: Previewer,
    ) -> Self {
        Self {
            rx,
            ws_tx,
            previewer,
            has_error: false,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                PreviewMsg::Render { reason } => {
                    if self.render(reason).await.is_err() {
                        break; // WsActor gone
                    }
                }
                PreviewMsg::Shutdown => {
                    crate::debug!("render"; "shutting down");
                    break;
                }
            }
        }
    }

    /// Render once and forward the outcome.
    ///
    /// Returns `Err(())` if WsActor shut down
    async fn render(&mut self, reason: RenderReason) -> Result<(), ()> {
        crate::debug!("render"; "{} ({})", self.file_name(), reason.label());

        let outgoing = match self.previewer.render() {
            Ok(preview) => {
                logger::status_success(&self.summary(&preview));
                let mut msgs = Vec::with_capacity(2);
                if std::mem::take(&mut self.has_error) {
                    msgs.push(WsMsg::ClearError);
                }
                msgs.push(WsMsg::Content {
                    html: preview.html,
                    dialect: preview.dialect,
                    changed: preview.changed,
                });
                msgs
            }
            Err(err) => {
                let detail = error_detail(&err);
                logger::status_error(&format!("render failed: {}", self.file_name()), &detail);
                self.has_error = true;
                vec![WsMsg::Error {
                    path: self.previewer.path().display().to_string(),
                    error: detail,
                }]
            }
        };

        for msg in outgoing {
            self.ws_tx.send(msg).await.map_err(|_| ())?;
        }
        Ok(())
    }

    fn summary(&self, preview: &Preview) -> String {
        match preview.dialect {
            crate::core::Dialect::Gemtext => format!(
                "rendered {} ({} blocks, {} changed)",
                self.file_name(),
                preview.blocks,
                preview.changed
            ),
            crate::core::Dialect::Markdown => format!("rendered {}", self.file_name()),
        }
    }

    fn file_name(&self) -> String {
        let path = self.previewer.path();
        path.file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// The underlying I/O message, without the path already shown in the summary.
fn error_detail(err: &PreviewError) -> String {
    err.source()
        .map_or_else(|| err.to_string(), ToString::to_string)
}
