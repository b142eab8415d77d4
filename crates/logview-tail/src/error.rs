//! Errors raised while opening or following a log file

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while tailing a log file
#[derive(Error, Debug)]
pub enum TailError {
    #[error("Log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' is not a regular file (directory or other entry)", .0.display())]
    NotAFile(PathBuf),

    #[error("Permission denied opening '{}': {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading appended bytes failed; monitoring continues on the next cycle.
    #[error("Failed to read new lines from '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Monitored file '{}' was moved or deleted", .0.display())]
    Vanished(PathBuf),

    #[error("Failed to reopen truncated log file: {0}")]
    Reopen(#[source] Box<TailError>),

    #[error("Tail worker is no longer running")]
    WorkerClosed,
}

impl TailError {
    /// Map an I/O error from opening `path` onto the open-failure taxonomy.
    pub(crate) fn from_open(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => TailError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => TailError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => TailError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Transient errors are reported but do not end the monitoring session.
    pub fn is_transient(&self) -> bool {
        matches!(self, TailError::Read { .. })
    }
}

pub type Result<T> = std::result::Result<T, TailError>;
