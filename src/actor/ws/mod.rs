//! WebSocket Actor - Bidirectional Communication
//!
//! This actor is responsible for:
//! - Managing WebSocket client connections
//! - Broadcasting rendered content and errors to all connected clients
//! - Receiving client requests (`ready`, `open`, `quit`)
//!
//! # Architecture
//!
//! ```text
//! PreviewActor --[Content/Error]--> WsActor --[broadcast]--> Clients
//!       ^                                                      |
//!       +----------------[ready]-------------------------------+
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::{PreviewMsg, WsMsg};
use crate::reload::message::ServerMessage;
use crate::reload::origin::AllowedOrigin;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Channel for client render requests
    preview_tx: mpsc::Sender<PreviewMsg>,
    /// Connected clients (shared for broadcast + read threads)
    clients: Clients,
    /// Origin a handshake must come from
    origin: AllowedOrigin,
}

impl WsActor {
    /// Create a new WsActor
    pub fn new(
        rx: mpsc::Receiver<WsMsg>,
        preview_tx: mpsc::Sender<PreviewMsg>,
        origin: AllowedOrigin,
    ) -> Self {
        Self {
            rx,
            preview_tx,
            clients: Arc::new(Mutex::new(Vec::new())),
            origin,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        // Spawn a background thread to poll client messages
        let clients_for_reader = Arc::clone(&self.clients);
        let preview_tx = self.preview_tx.clone();
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader, preview_tx);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Content {
                    html,
                    dialect,
                    changed,
                } => {
                    crate::debug!("ws"; "sending {} content ({} changed)", dialect, changed);
                    self.broadcast(&ServerMessage::content(html, dialect, changed));
                }

                WsMsg::Error { path, error } => {
                    self.broadcast(&ServerMessage::error(path, error));
                }

                WsMsg::ClearError => {
                    self.broadcast(&ServerMessage::clear_error());
                }

                WsMsg::AddClient(stream) => {
                    self.add_client(stream);
                }

                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut ws in clients.drain(..) {
                        let _ = ws.close(None);
                        let _ = ws.flush();
                    }
                    break;
                }
            }
        }
    }
}
