//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! FsActor --Render--> PreviewActor --Content/Error--> WsActor
//!                          ^                             |
//!                          +---------Render(ready)-------+
//! ```

use std::net::TcpStream;

use crate::core::Dialect;

// =============================================================================
// PreviewActor Messages
// =============================================================================

/// Why a render was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderReason {
    /// First render after the server started
    Startup,
    /// The source file was created or modified
    FileChanged,
    /// A browser (re)loaded the preview page
    ClientReady,
}

impl RenderReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::FileChanged => "file changed",
            Self::ClientReady => "client ready",
        }
    }
}

/// Messages to Preview Actor
#[derive(Debug)]
pub enum PreviewMsg {
    /// Read, parse and render the source file
    Render { reason: RenderReason },
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Replace the preview pane
    Content {
        html: String,
        dialect: Dialect,
        changed: usize,
    },
    /// Render error (display overlay, keep current content)
    Error { path: String, error: String },
    /// Clear error overlay (render succeeded after error)
    ClearError,
    /// Add client
    AddClient(TcpStream),
    /// Shutdown
    Shutdown,
}
