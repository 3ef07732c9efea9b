//! Live Preview Message Protocol
//!
//! Defines the JSON message format for WebSocket communication between
//! the preview server and browser clients.
//!
//! # Server → client
//!
//! - `connected`: Handshake completed
//! - `content`: Replace the preview pane
//! - `error`: Show the error overlay
//! - `clear_error`: Hide the error overlay
//!
//! # Client → server
//!
//! - `ready`: Page loaded, render now
//! - `open`: Open a link target in the system browser
//! - `quit`: Stop the server

use serde::{Deserialize, Serialize};

use crate::core::Dialect;

/// Message sent to browser clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    /// Rendered document
    Content {
        html: String,
        dialect: Dialect,
        /// Number of blocks flagged as changed
        changed: usize,
    },

    /// Render error (display overlay, keep current content)
    Error {
        /// Source file path
        path: String,
        /// Error message
        error: String,
    },

    /// Clear error overlay (render succeeded after error)
    ClearError,
}

impl ServerMessage {
    /// Create a connected message
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create a content message
    pub fn content(html: impl Into<String>, dialect: Dialect, changed: usize) -> Self {
        Self::Content {
            html: html.into(),
            dialect,
            changed,
        }
    }

    /// Create an error message
    pub fn error(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            path: path.into(),
            error: error.into(),
        }
    }

    /// Create a clear error message
    pub fn clear_error() -> Self {
        Self::ClearError
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"clear_error"}"#.to_string())
    }
}

/// Message received from browser clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The page finished loading and wants current content
    Ready,
    /// A link in the preview was clicked
    Open { url: String },
    /// The user asked to stop the server
    Quit,
}

impl ClientMessage {
    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_serialization() {
        let json = ServerMessage::content("<p data-line=\"1\">x</p>\n", Dialect::Gemtext, 2).to_json();
        assert!(json.starts_with(r#"{"type":"content""#));
        assert!(json.contains(r#""dialect":"gemtext""#));
        assert!(json.contains(r#""changed":2"#));
        assert!(json.contains(r#"<p data-line=\"1\">x</p>\n"#));
    }

    #[test]
    fn test_error_and_clear() {
        let json = ServerMessage::error("/tmp/a.gmi", "not found").to_json();
        assert_eq!(
            json,
            r#"{"type":"error","path":"/tmp/a.gmi","error":"not found"}"#
        );
        assert_eq!(ServerMessage::clear_error().to_json(), r#"{"type":"clear_error"}"#);
    }

    #[test]
    fn test_connected_has_version() {
        let json = ServerMessage::connected().to_json();
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"ready"}"#),
            Some(ClientMessage::Ready)
        );
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"open","url":"gemini://example.org/"}"#),
            Some(ClientMessage::Open {
                url: "gemini://example.org/".into()
            })
        );
        assert_eq!(
            ClientMessage::from_json(r#"{"type":"quit"}"#),
            Some(ClientMessage::Quit)
        );
    }

    #[test]
    fn test_unknown_client_message() {
        assert_eq!(ClientMessage::from_json(r#"{"type":"page","path":"/"}"#), None);
        assert_eq!(ClientMessage::from_json("not json"), None);
        assert_eq!(ClientMessage::from_json(r#"{"type":"open"}"#), None);
    }
}
