//! File cursor
//!
//! Open read handle plus the byte offset up to which the file has been consumed.

use crate::error::{Result, TailError};
use crate::settings::TailSettings;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Tracks the read position inside a log file
#[derive(Debug)]
pub struct FileCursor {
    path: PathBuf,
    /// None once closed
    file: Option<File>,
    /// Byte offset of the last read position
    offset: u64,
    /// Trailing bytes of an incomplete UTF-8 sequence, completed by the next read
    carry: Vec<u8>,
}

impl FileCursor {
    /// Open `path` for tailing.
    ///
    /// Fails with `NotFound`, `NotAFile` or `PermissionDenied` before any
    /// bytes are read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path).map_err(|e| TailError::from_open(&path, e))?;
        if !metadata.is_file() {
            return Err(TailError::NotAFile(path));
        }

        let file = File::open(&path).map_err(|e| TailError::from_open(&path, e))?;
        log::debug!("Opened '{}' ({} bytes)", path.display(), metadata.len());

        Ok(Self {
            path,
            file: Some(file),
            offset: 0,
            carry: Vec::new(),
        })
    }

    /// Read the last `settings.initial_lines` lines, oldest first.
    ///
    /// Seeks to an estimated start instead of scanning the whole file. When
    /// the read starts mid-file the first line is dropped since it is most
    /// likely partial. Afterwards the offset points at the end of the data
    /// that was read.
    pub fn read_initial(&mut self, settings: &TailSettings) -> Result<Vec<String>> {
        let size = self
            .handle()
            .and_then(|file| file.seek(SeekFrom::End(0)))
            .map_err(|e| self.read_error(e))?;
        let start = size.saturating_sub(settings.estimate_bytes(settings.initial_lines));

        let mut bytes = Vec::new();
        let read = self
            .handle()
            .and_then(|file| {
                file.seek(SeekFrom::Start(start))?;
                file.read_to_end(&mut bytes)
            })
            .map_err(|e| self.read_error(e))?;
        self.offset = start + read as u64;
        self.carry.clear();

        let text = self.decode(bytes);
        let mut lines: Vec<&str> = text.lines().collect();
        if start > 0 && !lines.is_empty() {
            log::debug!("Dropping partial first line at offset {}", start);
            lines.remove(0);
        }

        let keep_from = lines.len().saturating_sub(settings.initial_lines);
        log::debug!(
            "Initial read of '{}': {} bytes from offset {}, keeping {} lines",
            self.path.display(),
            read,
            start,
            lines.len() - keep_from
        );

        Ok(lines[keep_from..]
            .iter()
            .map(|line| line.trim().to_string())
            .collect())
    }

    /// Current size of the file on disk
    pub fn size(&self) -> io::Result<u64> {
        fs::metadata(&self.path).map(|m| m.len())
    }

    /// Read everything appended since the last read and advance the offset.
    ///
    /// Invalid UTF-8 is replaced rather than failing the read. A failed read
    /// leaves the offset alone and drops the handle; the next read reopens
    /// the file and retries from the same offset.
    pub fn read_appended(&mut self) -> io::Result<String> {
        let offset = self.offset;
        let mut bytes = std::mem::take(&mut self.carry);
        let carried = bytes.len();
        let result = self.handle().and_then(|file| {
            file.seek(SeekFrom::Start(offset))?;
            file.read_to_end(&mut bytes)
        });
        let read = match result {
            Ok(read) => read,
            Err(e) => {
                // Keep the carried bytes for the retry
                bytes.truncate(carried);
                self.carry = bytes;
                self.file = None;
                return Err(e);
            }
        };
        self.offset += read as u64;
        Ok(self.decode(bytes))
    }

    /// Release the read handle. The next read opens the file again.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            log::debug!("Closed '{}'", self.path.display());
        }
        self.carry.clear();
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn handle(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                log::debug!(
                    "Reopening '{}' at offset {}",
                    self.path.display(),
                    self.offset
                );
                File::open(&self.path)?
            }
        };
        Ok(self.file.insert(file))
    }

    /// Swap in a write-only handle so the next read fails
    #[cfg(test)]
    pub(crate) fn break_handle(&mut self) {
        let file = fs::OpenOptions::new().append(true).open(&self.path).unwrap();
        self.file = Some(file);
    }

    fn decode(&mut self, mut bytes: Vec<u8>) -> String {
        let incomplete = incomplete_utf8_suffix(&bytes);
        if incomplete > 0 {
            self.carry = bytes.split_off(bytes.len() - incomplete);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn read_error(&self, source: io::Error) -> TailError {
        TailError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

/// Length of a multi-byte UTF-8 sequence cut off at the end of `bytes`
fn incomplete_utf8_suffix(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}
