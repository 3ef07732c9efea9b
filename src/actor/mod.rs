//! Actor System for Live Preview
//!
//! Message-passing concurrency for serve mode:
//!
//! ```text
//! FsActor --> PreviewActor --> WsActor
//! (watch)     (parse/diff)    (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File watcher with trailing-edge debouncing
//! - `preview` - Serialized rendering of the source file
//! - `ws` - WebSocket broadcast and client requests
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod preview;
pub mod ws;

pub use coordinator::Coordinator;
