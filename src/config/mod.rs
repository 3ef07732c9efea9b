//! Preview configuration management for `gempeek.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── markdown   # [markdown]
//! │   ├── serve      # [serve]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # PreviewConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `[serve]`    | Preview server (interface, ports, browser open) |
//! | `[watch]`    | File watcher (debounce interval)                |
//! | `[markdown]` | Markdown extensions                             |
//!
//! The file is optional: without one every section takes its defaults.

pub mod section;
pub mod types;
mod util;

pub use util::CONFIG_FILE;
use util::find_config_file;

pub use section::{MarkdownConfig, ServeConfig, WatchConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing gempeek.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreviewConfig {
    /// Absolute path of the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// File watcher settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Markdown rendering settings
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl PreviewConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for `gempeek.toml`; if none is found the
    /// defaults apply. An explicit `-C` path must exist. CLI options are
    /// applied on top of whatever was loaded.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_command_options(cli);
        config
            .validate()
            .with_context(|| match &config.config_path {
                Some(path) => format!("Invalid configuration in {}", path.display()),
                None => "Invalid command-line options".to_string(),
            })?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.serve.validate()?;
        self.watch.validate()?;
        Ok(())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve {
                interface,
                port,
                open,
                debounce,
                verbose,
                ..
            } => {
                crate::logger::set_verbose(*verbose);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.open, open.as_ref());
                Self::update_option(&mut self.watch.debounce_ms, debounce.as_ref());
            }
            // Render only reads the [markdown] section
            Commands::Render { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

/// Parse a config snippet in tests, panicking on error.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PreviewConfig {
    PreviewConfig::from_str(content).unwrap()
}

// ============================================================================
// tests
// ============================================================================
