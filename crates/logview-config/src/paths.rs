//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/logview/`, `~/.cache/logview/`
//! - macOS: `~/Library/Application Support/logview/`, `~/Library/Caches/logview/`
//! - Windows: `%APPDATA%\logview\`, `%LOCALAPPDATA%\logview\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "logview";

/// Get the application config directory, creating it if missing
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Get the application cache directory, creating it if missing
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Get path to the global app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default location of the custom highlight rules
pub fn highlight_rules_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("highlight_rules.json"))
}
