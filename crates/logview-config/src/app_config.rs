//! Application configuration
//!
//! Configuration loaded from `.logview.toml`:
//!
//! ```toml
//! log_directory = "C:/services/logs"
//! render_cap = 5000
//!
//! [tail]
//! initial_lines = 1000
//! poll_interval_ms = 1000
//! ```

use logview_tail::TailSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lines kept on screen by default
pub const DEFAULT_RENDER_CAP: usize = 5000;

/// Application configuration loaded from .logview.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory scanned for log files when none is given
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// Custom highlight rules file (None = config directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_rules_file: Option<PathBuf>,

    /// Maximum number of lines rendered; the full history stays in memory
    #[serde(default = "default_render_cap")]
    pub render_cap: usize,

    #[serde(default)]
    pub tail: TailSettings,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_render_cap() -> usize {
    DEFAULT_RENDER_CAP
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            highlight_rules_file: None,
            render_cap: default_render_cap(),
            tail: TailSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Effective location of the highlight rules file
    pub fn highlight_rules_path(&self) -> anyhow::Result<PathBuf> {
        match &self.highlight_rules_file {
            Some(path) => Ok(path.clone()),
            None => crate::paths::highlight_rules_path(),
        }
    }
}
