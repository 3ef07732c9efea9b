//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! debounce_ms = 500           # Quiet interval before re-rendering
//! ```

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Allowed debounce interval in milliseconds.
const DEBOUNCE_RANGE: RangeInclusive<u64> = 1..=10_000;

/// File watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Trailing-edge debounce: a render fires once no event arrived for this long.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !DEBOUNCE_RANGE.contains(&self.debounce_ms) {
            return Err(ConfigError::Validation(format!(
                "watch.debounce_ms must be between {} and {}, got {}",
                DEBOUNCE_RANGE.start(),
                DEBOUNCE_RANGE.end(),
                self.debounce_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_watch_config() {
        let config = test_parse_config("[watch]\ndebounce_ms = 250");
        assert_eq!(config.watch.debounce(), Duration::from_millis(250));
        assert!(config.watch.validate().is_ok());
    }

    #[test]
    fn test_debounce_bounds() {
        for (value, ok) in [(0, false), (1, true), (10_000, true), (10_001, false)] {
            let config = WatchConfig { debounce_ms: value };
            assert_eq!(config.validate().is_ok(), ok, "debounce_ms = {value}");
        }
    }
}
