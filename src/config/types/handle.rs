//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from the actor tasks and the HTTP
//! worker threads.

use crate::config::PreviewConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<PreviewConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(PreviewConfig::default()));

#[inline]
pub fn cfg() -> Arc<PreviewConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: PreviewConfig) -> Arc<PreviewConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
