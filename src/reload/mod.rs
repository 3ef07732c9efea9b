//! Reload Module
//!
//! WebSocket channel that pushes rendered content to the preview page.
//!
//! # Modules
//!
//! - `message` - Message types (content, error, client requests)
//! - `origin` - Handshake origin check
//! - `server` - WebSocket listener for client connections

pub mod message;
pub mod origin;
pub mod server;
