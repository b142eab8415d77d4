//! Tailing settings
//!
//! Loaded as the `[tail]` section of the application config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of trailing lines shown when a file is opened
pub const DEFAULT_INITIAL_LINES: usize = 1000;
/// Average line length used to estimate where the last N lines start
pub const DEFAULT_AVG_BYTES_PER_LINE: u64 = 200;
/// Poll fallback interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Batch flush interval
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailSettings {
    /// Lines fetched by the initial tail read
    pub initial_lines: usize,
    /// Heuristic line length for the initial seek
    pub avg_bytes_per_line: u64,
    /// Interval of the authoritative size poll
    pub poll_interval_ms: u64,
    /// Interval at which pending lines are delivered as one batch
    pub flush_interval_ms: u64,
}

impl Default for TailSettings {
    fn default() -> Self {
        Self {
            initial_lines: DEFAULT_INITIAL_LINES,
            avg_bytes_per_line: DEFAULT_AVG_BYTES_PER_LINE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
        }
    }
}

impl TailSettings {
    /// Approximate byte span of the last `lines` lines
    pub fn estimate_bytes(&self, lines: usize) -> u64 {
        (lines as u64).saturating_mul(self.avg_bytes_per_line)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms.max(1))
    }
}
