//! `[markdown]` section configuration.
//!
//! Toggles the pulldown-cmark extensions used for Markdown files.
//!
//! # Example
//!
//! ```toml
//! [markdown]
//! tables = true
//! footnotes = true
//! strikethrough = true
//! task_lists = true
//! smart_punctuation = true    # "quotes" and -- dashes
//! heading_attributes = true   # # Title {#id .class}
//! ```

use serde::{Deserialize, Serialize};

/// Markdown extension settings. Everything is enabled by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    pub smart_punctuation: bool,
    pub heading_attributes: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            smart_punctuation: true,
            heading_attributes: true,
        }
    }
}
