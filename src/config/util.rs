//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Default config file name, searched upward from the current directory.
pub const CONFIG_FILE: &str = "gempeek.toml";

/// Locate the config file for `-C config_name`.
///
/// The default name is searched upward from the current directory and may
/// be absent. Any other name is taken as given (relative to the current
/// directory), so a missing explicit file surfaces as a read error.
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    locate(&cwd, config_name)
}

fn locate(cwd: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name == Path::new(CONFIG_FILE) {
        find_from(cwd, config_name)
    } else {
        Some(cwd.join(config_name))
    }
}

/// Walk up from `start` looking for `config_name`.
///
/// # Example
/// ```text
/// /home/user/notes/drafts/  ← start
/// /home/user/notes/gempeek.toml  ← found!
/// ```
fn find_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
