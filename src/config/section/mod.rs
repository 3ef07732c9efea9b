//! Configuration section definitions.

mod markdown;
mod serve;
mod watch;

pub use markdown::MarkdownConfig;
pub use serve::ServeConfig;
pub use watch::WatchConfig;
