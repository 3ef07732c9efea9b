//! Core types - pure abstractions shared across the codebase.

mod dialect;
mod state;

pub use dialect::Dialect;
pub use state::{is_shutdown, register_server, request_shutdown, setup_shutdown_handler};
