use std::net::TcpStream;

use tokio::sync::mpsc;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;
use tungstenite::protocol::Message;

use crate::actor::messages::{PreviewMsg, RenderReason};
use crate::reload::message::{ClientMessage, ServerMessage};

use super::{Clients, WsActor};

/// Reader poll interval
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

impl WsActor {
    /// Add a new client connection
    ///
    /// Handshakes from any origin but the preview page are refused with 403.
    pub(super) fn add_client(&self, stream: TcpStream) {
        let origin = self.origin;
        let check_origin = move |request: &Request, response: Response| {
            let header = request.headers().get("origin").and_then(|v| v.to_str().ok());
            if origin.allows(header) {
                Ok(response)
            } else {
                crate::log!("ws"; "rejected handshake from origin {}", header.unwrap_or("(none)"));
                Err(forbidden())
            }
        };

        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept_hdr(stream, check_origin) {
            Ok(mut ws) => {
                let connected = ServerMessage::connected();
                if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
                    crate::log!("ws"; "failed to send connected message: {}", e);
                    return;
                }

                // Now set non-blocking for polling reads
                let _ = ws.get_ref().set_nonblocking(true);

                let mut clients = self.clients.lock();
                clients.push(ws);
                crate::debug!("ws"; "client connected (total: {})", clients.len());
            }
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread to read client messages (non-blocking poll)
    pub(super) fn client_reader_loop(clients: Clients, preview_tx: mpsc::Sender<PreviewMsg>) {
        loop {
            std::thread::sleep(POLL_INTERVAL);
            if crate::core::is_shutdown() || preview_tx.is_closed() {
                break;
            }

            // Collect requests under the lock, act on them after releasing it
            let requests = {
                let mut clients_guard = clients.lock();
                let mut requests = Vec::new();
                clients_guard.retain_mut(|ws| loop {
                    match ws.read() {
                        Ok(Message::Text(text)) => {
                            if let Some(request) = ClientMessage::from_json(text.as_str()) {
                                requests.push(request);
                            } else {
                                crate::debug!("ws"; "ignoring message: {}", text.as_str());
                            }
                        }
                        Ok(Message::Close(_)) => break false,
                        Ok(_) => {}
                        Err(tungstenite::Error::Io(ref e))
                            if e.kind() == std::io::ErrorKind::WouldBlock =>
                        {
                            // Drained for now; push out anything still queued
                            let _ = ws.flush();
                            break true;
                        }
                        Err(_) => break false,
                    }
                });
                requests
            };

            for request in requests {
                handle_request(request, &preview_tx);
            }
        }
    }
}

fn forbidden() -> ErrorResponse {
    let mut response = ErrorResponse::new(Some("origin not allowed".to_string()));
    *response.status_mut() = StatusCode::FORBIDDEN;
    response
}

/// Act on one client request.
fn handle_request(request: ClientMessage, preview_tx: &mpsc::Sender<PreviewMsg>) {
    match request {
        ClientMessage::Ready => {
            // A full queue already holds a render that will reach this client
            let _ = preview_tx.try_send(PreviewMsg::Render {
                reason: RenderReason::ClientReady,
            });
        }
        ClientMessage::Open { url } => {
            if let Err(e) = crate::utils::browser::open_url(&url) {
                crate::log!("open"; "{:#}", e);
            }
        }
        ClientMessage::Quit => {
            crate::log!("serve"; "quit requested by browser");
            crate::core::request_shutdown();
        }
    }
}
