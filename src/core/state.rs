//! Shutdown state for serve mode.
//!
//! Shutdown can be requested from two places: Ctrl+C, or a browser client
//! sending `quit`. Both go through [`request_shutdown`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a server has been registered:
/// - Before `register_server()`: exits immediately
/// - After `register_server()`: graceful shutdown (unblock server, notify actors)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SERVER.get().is_none() {
            // Nothing to shut down gracefully yet
            std::process::exit(0);
        }
        request_shutdown();
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>, shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SERVER.set(server);
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Set the shutdown flag, notify the actor system and unblock the server.
///
/// Only the first call has an effect.
pub fn request_shutdown() {
    if !first_request(&SHUTDOWN) {
        return;
    }

    if let Some(tx) = SHUTDOWN_TX.get() {
        let _ = tx.send(());
    }

    if let Some(server) = SERVER.get() {
        crate::log!("serve"; "shutting down...");
        server.unblock();
    }
}

/// Set `flag`, returning whether this call was the one that set it.
fn first_request(flag: &AtomicBool) -> bool {
    !flag.swap(true, Ordering::SeqCst)
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering for performance - worst case is processing
/// a few more items before stopping, which is acceptable
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Uses a local flag: the global one would stop every loop under test
    #[test]
    fn test_only_first_request_takes_effect() {
        let flag = AtomicBool::new(false);
        assert!(first_request(&flag));
        assert!(flag.load(Ordering::SeqCst));
        assert!(!first_request(&flag));
        assert!(flag.load(Ordering::SeqCst));
    }
}
