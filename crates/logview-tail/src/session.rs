//! Monitoring session for one log file
//!
//! Ties a `TailReader`, a `LineBuffer` and the active filter together and
//! reports everything through a `TailSink`. All methods are synchronous; the
//! worker decides when they run.

use crate::buffer::LineBuffer;
use crate::error::{Result, TailError};
use crate::filter::FilterState;
use crate::reader::{CycleOutcome, ReaderState, TailReader};
use crate::settings::TailSettings;
use crate::sink::TailSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Synthetic record placed at the start of the history after a truncation
pub const TRUNCATION_MARKER: &str = "--- Log file truncated or rotated, restarting read ---";

#[derive(Debug)]
pub struct TailSession {
    reader: TailReader,
    buffer: LineBuffer,
    filter: FilterState,
    stop: Arc<AtomicBool>,
}

impl TailSession {
    /// Open `path`, load its tail into the history and send the initial full replace.
    ///
    /// Open errors are returned without touching the sink; the caller reports them.
    pub fn open<S>(
        path: impl Into<PathBuf>,
        settings: &TailSettings,
        filter: FilterState,
        stop: Arc<AtomicBool>,
        sink: &mut S,
    ) -> Result<Self>
    where
        S: TailSink + ?Sized,
    {
        let (reader, initial) = TailReader::open(path, settings.clone())?;
        log::info!(
            "Monitoring '{}' ({} initial lines, offset {})",
            reader.path().display(),
            initial.len(),
            reader.offset()
        );

        let mut buffer = LineBuffer::new();
        buffer.extend_history(initial);

        let session = Self {
            reader,
            buffer,
            filter,
            stop,
        };
        sink.on_full_replace(session.visible());
        Ok(session)
    }

    /// Run one read cycle.
    ///
    /// Transient read failures are reported and swallowed. An `Err` means the
    /// session cannot continue and must be finished with that error.
    pub fn poll_cycle<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: TailSink + ?Sized,
    {
        if self.is_stopping() {
            return Ok(());
        }

        match self.reader.read_cycle() {
            Ok(CycleOutcome::Unchanged) => {}
            Ok(CycleOutcome::Appended(lines)) => {
                if self.is_stopping() {
                    return Ok(());
                }
                for line in lines {
                    self.buffer.push(line, &self.filter);
                }
            }
            Ok(CycleOutcome::Truncated { initial }) => {
                self.buffer.reset_with_marker(TRUNCATION_MARKER);
                self.buffer.extend_history(initial);
                sink.on_full_replace(self.visible());
            }
            Err(e) if e.is_transient() => {
                log::warn!("{}", e);
                sink.on_error(e.to_string());
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    /// Deliver queued lines as one batch. Returns whether a batch was sent.
    pub fn flush<S>(&mut self, sink: &mut S) -> bool
    where
        S: TailSink + ?Sized,
    {
        match self.buffer.take_pending() {
            Some(batch) => {
                log::trace!("Flushing batch of {} lines", batch.len());
                sink.on_batch(batch);
                true
            }
            None => false,
        }
    }

    /// Switch the filter and re-render the whole history under it
    pub fn apply_filter<S>(&mut self, filter: FilterState, sink: &mut S)
    where
        S: TailSink + ?Sized,
    {
        log::debug!(
            "Filter changed to '{}' ({}), re-filtering {} lines",
            filter.term(),
            filter.mode(),
            self.buffer.len()
        );
        self.filter = filter;
        self.buffer.discard_pending();
        sink.on_full_replace(self.visible());
    }

    /// End the session: final flush, optional error report, then `on_stopped`.
    ///
    /// Consumes the session so the file handle is released.
    pub fn finish<S>(mut self, sink: &mut S, error: Option<TailError>)
    where
        S: TailSink + ?Sized,
    {
        self.flush(sink);
        if let Some(e) = error {
            log::error!("Monitoring of '{}' ended: {}", self.reader.path().display(), e);
            sink.on_error(e.to_string());
        } else {
            log::info!("Monitoring of '{}' stopped", self.reader.path().display());
        }
        sink.on_stopped();
    }

    /// Currently visible lines
    pub fn visible(&self) -> Vec<String> {
        self.buffer.visible(&self.filter)
    }

    pub fn history(&self) -> &[String] {
        self.buffer.history()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    pub fn offset(&self) -> u64 {
        self.reader.offset()
    }

    pub fn reader_state(&self) -> ReaderState {
        self.reader.state()
    }

    fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::sink::TailEvent;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn append(path: &Path, content: &str) {
        let mut file = fs::OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn open(path: &Path, filter: FilterState, events: &mut Vec<TailEvent>) -> TailSession {
        TailSession::open(
            path,
            &TailSettings::default(),
            filter,
            Arc::new(AtomicBool::new(false)),
            events,
        )
        .unwrap()
    }

    #[test]
    fn test_open_sends_full_replace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        fs::write(&path, "a\nb\n").unwrap();
        let mut events = Vec::new();

        let session = open(&path, FilterState::disabled(), &mut events);

        assert_eq!(
            events,
            vec![TailEvent::FullReplace(vec!["a".to_string(), "b".to_string()])]
        );
        assert_eq!(session.history(), ["a", "b"]);
    }

    #[test]
    fn test_cycle_then_flush_delivers_one_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        fs::write(&path, "").unwrap();
        let mut events = Vec::new();
        let mut session = open(&path, FilterState::disabled(), &mut events);
        events.clear();

        append(&path, "x\ny\n");
        session.poll_cycle(&mut events).unwrap();
        append(&path, "z\n");
        session.poll_cycle(&mut events).unwrap();
        assert!(events.is_empty());

        assert!(session.flush(&mut events));
        assert!(!session.flush(&mut events));
        assert_eq!(
            events,
            vec![TailEvent::Batch(vec![
                "x".to_string(),
                "y".to_string(),
                "z".to_string()
            ])]
        );
    }

    #[test]
    fn test_filter_change_replaces_content_and_drops_pending() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        fs::write(&path, "INFO up\nERROR down\n").unwrap();
        let mut events = Vec::new();
        let mut session = open(&path, FilterState::disabled(), &mut events);
        events.clear();

        append(&path, "error again\n");
        session.poll_cycle(&mut events).unwrap();
        session.apply_filter(FilterState::new("error", FilterMode::Include), &mut events);
        session.flush(&mut events);

        assert_eq!(
            events,
            vec![TailEvent::FullReplace(vec![
                "ERROR down".to_string(),
                "error again".to_string()
            ])]
        );
    }

    #[test]
    fn test_stop_flag_skips_cycle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        fs::write(&path, "").unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let mut events = Vec::new();
        let mut session = TailSession::open(
            &path,
            &TailSettings::default(),
            FilterState::disabled(),
            Arc::clone(&stop),
            &mut events,
        )
        .unwrap();

        append(&path, "ignored for now\n");
        stop.store(true, Ordering::SeqCst);
        session.poll_cycle(&mut events).unwrap();

        assert_eq!(session.offset(), 0);
        assert_eq!(session.history().len(), 0);
    }

    #[test]
    fn test_read_error_is_reported_and_monitoring_continues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        fs::write(&path, "a\n").unwrap();
        let mut events = Vec::new();
        let mut session = open(&path, FilterState::disabled(), &mut events);
        events.clear();

        append(&path, "b\n");
        session.reader.cursor_mut().break_handle();
        session.poll_cycle(&mut events).unwrap();
        assert!(!session.flush(&mut events));
        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], TailEvent::Error(msg) if msg.contains("Failed to read new lines")),
            "unexpected events: {events:?}"
        );

        events.clear();
        session.poll_cycle(&mut events).unwrap();
        session.flush(&mut events);
        assert_eq!(events, vec![TailEvent::Batch(vec!["b".to_string()])]);
        assert_eq!(session.history(), ["a", "b"]);
    }

    #[test]
    fn test_failed_reopen_ends_session_with_one_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        let content: String = (0..2000).map(|i| format!("line {i:>44}\n")).collect();
        fs::write(&path, &content).unwrap();
        let mut events = Vec::new();
        let mut session = open(&path, FilterState::disabled(), &mut events);
        events.clear();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = session.poll_cycle(&mut events).unwrap_err();
        assert!(matches!(err, TailError::Reopen(_)));
        assert!(events.is_empty());

        session.finish(&mut events, Some(err));
        assert_eq!(events.len(), 2, "unexpected events: {events:?}");
        assert!(matches!(&events[0], TailEvent::Error(msg) if msg.contains("reopen")));
        assert_eq!(events[1], TailEvent::Stopped);
    }

    #[test]
    fn test_finish_flushes_then_reports() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        fs::write(&path, "").unwrap();
        let mut events = Vec::new();
        let mut session = open(&path, FilterState::disabled(), &mut events);
        events.clear();

        append(&path, "last words\n");
        session.poll_cycle(&mut events).unwrap();
        session.finish(&mut events, Some(TailError::Vanished(path.clone())));

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], TailEvent::Batch(vec!["last words".to_string()]));
        assert!(matches!(&events[1], TailEvent::Error(msg) if msg.contains("moved or deleted")));
        assert_eq!(events[2], TailEvent::Stopped);
    }
}
