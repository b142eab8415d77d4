//! Incremental read cycle and truncation recovery

use crate::cursor::FileCursor;
use crate::error::{Result, TailError};
use crate::settings::TailSettings;
use std::io;
use std::path::{Path, PathBuf};
use strum::Display;

/// Lifecycle of a followed file across truncations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ReaderState {
    Monitoring,
    TruncationDetected,
    Reinitializing,
}

/// Result of one read cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// File size equals the tracked offset
    Unchanged,
    /// New non-empty lines, trimmed, in file order
    Appended(Vec<String>),
    /// File shrank; it was reopened and these are its initial tail lines
    Truncated { initial: Vec<String> },
}

/// Follows one file: owns its cursor and runs read cycles against it
#[derive(Debug)]
pub struct TailReader {
    cursor: FileCursor,
    state: ReaderState,
    settings: TailSettings,
}

impl TailReader {
    /// Open `path` and perform the initial tail read
    pub fn open(path: impl Into<PathBuf>, settings: TailSettings) -> Result<(Self, Vec<String>)> {
        let mut cursor = FileCursor::open(path)?;
        let initial = cursor.read_initial(&settings)?;
        let reader = Self {
            cursor,
            state: ReaderState::Monitoring,
            settings,
        };
        Ok((reader, initial))
    }

    /// Run one cycle: stat, detect truncation, read the appended delta.
    ///
    /// A stat failure other than "not found" is logged and treated as no change,
    /// the next cycle retries. Read failures come back as `TailError::Read` and
    /// leave the offset in place, so the next cycle reads the same delta again.
    pub fn read_cycle(&mut self) -> Result<CycleOutcome> {
        let size = match self.cursor.size() {
            Ok(size) => size,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TailError::Vanished(self.cursor.path().to_path_buf()));
            }
            Err(e) => {
                log::warn!(
                    "Failed to stat '{}', retrying next cycle: {}",
                    self.cursor.path().display(),
                    e
                );
                return Ok(CycleOutcome::Unchanged);
            }
        };

        let offset = self.cursor.offset();
        if size < offset {
            log::info!(
                "Truncation detected on '{}' ({} < {})",
                self.cursor.path().display(),
                size,
                offset
            );
            return self.recover_from_truncation();
        }
        if size == offset {
            return Ok(CycleOutcome::Unchanged);
        }

        let chunk = self.cursor.read_appended().map_err(|source| TailError::Read {
            path: self.cursor.path().to_path_buf(),
            source,
        })?;
        let lines = split_lines(&chunk);
        log::debug!(
            "Read {} new lines from '{}', offset now {}",
            lines.len(),
            self.cursor.path().display(),
            self.cursor.offset()
        );

        Ok(CycleOutcome::Appended(lines))
    }

    fn recover_from_truncation(&mut self) -> Result<CycleOutcome> {
        self.transition(ReaderState::TruncationDetected);
        self.transition(ReaderState::Reinitializing);

        self.cursor.close();
        let path = self.cursor.path().to_path_buf();
        let reopened = FileCursor::open(&path).and_then(|mut cursor| {
            let initial = cursor.read_initial(&self.settings)?;
            Ok((cursor, initial))
        });

        match reopened {
            Ok((cursor, initial)) => {
                self.cursor = cursor;
                self.transition(ReaderState::Monitoring);
                Ok(CycleOutcome::Truncated { initial })
            }
            Err(e) => Err(TailError::Reopen(Box::new(e))),
        }
    }

    fn transition(&mut self, next: ReaderState) {
        log::debug!("Reader state {} -> {}", self.state, next);
        self.state = next;
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn path(&self) -> &Path {
        self.cursor.path()
    }

    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    #[cfg(test)]
    pub(crate) fn cursor_mut(&mut self) -> &mut FileCursor {
        &mut self.cursor
    }
}

/// Split a chunk into trimmed lines, dropping blank ones
fn split_lines(chunk: &str) -> Vec<String> {
    chunk
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
