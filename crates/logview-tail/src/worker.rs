//! Tail worker
//!
//! A single tokio task owns the active session, the filter, the file watcher
//! and both timers. The UI talks to it through a `TailHandle`:
//! - Commands (select file, change filter, stop) arrive over a channel
//! - File notifications and the poll timer both funnel into the same read cycle
//! - The flush timer delivers pending lines as batches
//!
//! Because only this task touches the session, read cycles never overlap.

use crate::error::{Result, TailError};
use crate::filter::{FilterMode, FilterState};
use crate::notifier::ChangeNotifier;
use crate::session::TailSession;
use crate::settings::TailSettings;
use crate::sink::TailSink;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

#[derive(Debug)]
enum Command {
    SetLogFile(PathBuf),
    SetFilter(FilterState),
    Stop,
    Shutdown,
}

/// What woke the read cycle, for tracing
#[derive(Debug, Clone, Copy)]
enum WakeSource {
    Notification,
    Poll,
}

/// Control surface of a running tail worker
#[derive(Debug, Clone)]
pub struct TailHandle {
    tx: mpsc::UnboundedSender<Command>,
    stop: Arc<AtomicBool>,
}

impl TailHandle {
    /// Start following `path`, replacing the current file if any
    pub fn set_log_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.send(Command::SetLogFile(path.into()))
    }

    /// Change the filter; the whole history is re-rendered under it
    pub fn set_filter(&self, term: &str, mode: FilterMode) -> Result<()> {
        self.send(Command::SetFilter(FilterState::new(term, mode)))
    }

    /// Stop monitoring the current file. The worker stays available.
    pub fn stop(&self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        self.send(Command::Stop)
    }

    /// Stop monitoring and end the worker task
    pub fn shutdown(&self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| TailError::WorkerClosed)
    }
}

/// Spawn the tail worker on the current tokio runtime.
///
/// The worker runs until `TailHandle::shutdown` is called or every handle is
/// dropped; either way the active session gets its final flush.
pub fn spawn_tail_worker<S>(sink: S, settings: TailSettings) -> (TailHandle, JoinHandle<()>)
where
    S: TailSink + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    // Capacity 1: bursts of notifications collapse into one pending wake-up
    let (wake_tx, wake_rx) = mpsc::channel(1);

    let worker = TailWorker {
        sink,
        settings,
        filter: FilterState::disabled(),
        active: None,
        stop: Arc::clone(&stop),
        wake_tx,
    };
    let join = tokio::spawn(worker.run(rx, wake_rx));

    (TailHandle { tx, stop }, join)
}

struct ActiveSession {
    session: TailSession,
    _notifier: ChangeNotifier,
}

struct TailWorker<S> {
    sink: S,
    settings: TailSettings,
    filter: FilterState,
    active: Option<ActiveSession>,
    stop: Arc<AtomicBool>,
    wake_tx: mpsc::Sender<()>,
}

impl<S: TailSink> TailWorker<S> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut wake_rx: mpsc::Receiver<()>,
    ) {
        log::info!("Tail worker started");

        let mut poll = interval(self.settings.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut flush = interval(self.settings.flush_interval());
        flush.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Shutdown) => {
                        log::info!("Tail worker received shutdown signal");
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        log::info!("All tail handles dropped, shutting down");
                        break;
                    }
                },
                Some(()) = wake_rx.recv() => self.read_cycle(WakeSource::Notification),
                _ = poll.tick() => self.read_cycle(WakeSource::Poll),
                _ = flush.tick() => self.flush(),
            }
        }

        self.end_session(None);
        log::info!("Tail worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetLogFile(path) => self.load_file(path),
            Command::SetFilter(filter) => {
                self.filter = filter.clone();
                if let Some(active) = self.active.as_mut() {
                    active.session.apply_filter(filter, &mut self.sink);
                }
            }
            Command::Stop => {
                self.end_session(None);
                self.stop.store(false, Ordering::SeqCst);
            }
            Command::Shutdown => {}
        }
    }

    fn load_file(&mut self, path: PathBuf) {
        log::info!("Switching log file to '{}'", path.display());
        self.end_session(None);
        self.stop.store(false, Ordering::SeqCst);
        self.filter = FilterState::disabled();

        self.sink.on_file_loaded(&path);
        match TailSession::open(
            path.clone(),
            &self.settings,
            self.filter.clone(),
            Arc::clone(&self.stop),
            &mut self.sink,
        ) {
            Ok(session) => {
                let notifier = ChangeNotifier::subscribe(&path, self.wake_tx.clone());
                self.active = Some(ActiveSession {
                    session,
                    _notifier: notifier,
                });
            }
            Err(e) => {
                log::error!("Failed to start monitoring '{}': {}", path.display(), e);
                self.sink.on_error(e.to_string());
                self.sink.on_stopped();
            }
        }
    }

    fn read_cycle(&mut self, source: WakeSource) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        log::trace!("Read cycle triggered by {:?}", source);

        if let Err(e) = active.session.poll_cycle(&mut self.sink) {
            self.end_session(Some(e));
        }
    }

    fn flush(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.session.flush(&mut self.sink);
        }
    }

    /// Tear down the active session: final flush, handle closed, watcher dropped
    fn end_session(&mut self, error: Option<TailError>) {
        if let Some(active) = self.active.take() {
            active.session.finish(&mut self.sink, error);
        }
    }
}
