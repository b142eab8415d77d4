//! Consumer side of the tailing engine
//!
//! The engine never touches UI state directly; it pushes owned snapshots and
//! batches into a `TailSink`.

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Receives everything the engine produces for one viewer
pub trait TailSink: Send {
    /// A new file was selected. Fired before monitoring starts so the viewer
    /// can reset search, filter and scroll-follow.
    fn on_file_loaded(&mut self, path: &Path);

    /// Replace the whole visible content (file load, filter change, truncation)
    fn on_full_replace(&mut self, lines: Vec<String>);

    /// Append newly visible lines
    fn on_batch(&mut self, lines: Vec<String>);

    fn on_error(&mut self, message: String);

    /// Monitoring of the current file ended
    fn on_stopped(&mut self);
}

/// Events delivered by the channel-backed sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    FileLoaded(PathBuf),
    FullReplace(Vec<String>),
    Batch(Vec<String>),
    Error(String),
    Stopped,
}

impl TailSink for mpsc::UnboundedSender<TailEvent> {
    fn on_file_loaded(&mut self, path: &Path) {
        emit(self, TailEvent::FileLoaded(path.to_path_buf()));
    }

    fn on_full_replace(&mut self, lines: Vec<String>) {
        emit(self, TailEvent::FullReplace(lines));
    }

    fn on_batch(&mut self, lines: Vec<String>) {
        emit(self, TailEvent::Batch(lines));
    }

    fn on_error(&mut self, message: String) {
        emit(self, TailEvent::Error(message));
    }

    fn on_stopped(&mut self) {
        emit(self, TailEvent::Stopped);
    }
}

fn emit(tx: &mpsc::UnboundedSender<TailEvent>, event: TailEvent) {
    if let Err(e) = tx.send(event) {
        log::debug!("Tail consumer is gone, dropping event: {:?}", e.0);
    }
}

/// Records events in order, for synchronous consumers
impl TailSink for Vec<TailEvent> {
    fn on_file_loaded(&mut self, path: &Path) {
        self.push(TailEvent::FileLoaded(path.to_path_buf()));
    }

    fn on_full_replace(&mut self, lines: Vec<String>) {
        self.push(TailEvent::FullReplace(lines));
    }

    fn on_batch(&mut self, lines: Vec<String>) {
        self.push(TailEvent::Batch(lines));
    }

    fn on_error(&mut self, message: String) {
        self.push(TailEvent::Error(message));
    }

    fn on_stopped(&mut self) {
        self.push(TailEvent::Stopped);
    }
}
