//! File change notifications
//!
//! Best-effort wake-ups from the platform file watcher. Notifications can be
//! missed (network drives, write storms), so the worker's poll timer stays the
//! authoritative trigger; this only lowers latency.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use tokio::sync::mpsc;

/// Keeps a watcher subscription alive. Dropping it unsubscribes.
pub struct ChangeNotifier {
    watcher: Option<RecommendedWatcher>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("active", &self.is_active())
            .finish()
    }
}

impl ChangeNotifier {
    /// Subscribe to changes of `path`, waking `wake_tx` on each relevant event.
    ///
    /// Watches the parent directory so rotation (remove + create) is seen too.
    /// Never fails: without a watcher the poll fallback carries on alone.
    pub fn subscribe(path: &Path, wake_tx: mpsc::Sender<()>) -> Self {
        match watch(path, wake_tx) {
            Ok(watcher) => {
                log::debug!("Watching '{}' for changes", path.display());
                Self {
                    watcher: Some(watcher),
                }
            }
            Err(e) => {
                log::warn!(
                    "File notifications unavailable for '{}', relying on polling: {}",
                    path.display(),
                    e
                );
                Self::disabled()
            }
        }
    }

    /// Notifier without a subscription
    pub fn disabled() -> Self {
        Self { watcher: None }
    }

    pub fn is_active(&self) -> bool {
        self.watcher.is_some()
    }
}

fn watch(path: &Path, wake_tx: mpsc::Sender<()>) -> notify::Result<RecommendedWatcher> {
    let target = path.file_name().map(OsString::from);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_relevant(&event, target.as_deref()) => {
            // A full channel already holds a pending wake-up
            let _ = wake_tx.try_send(());
        }
        Ok(_) => {}
        Err(e) => log::debug!("File watcher error: {}", e),
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher.watch(dir, RecursiveMode::NonRecursive)?;

    Ok(watcher)
}

fn is_relevant(event: &Event, target: Option<&std::ffi::OsStr>) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any
    );
    kind_matches
        && event
            .paths
            .iter()
            .any(|p| target.is_some() && p.file_name() == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::ffi::OsStr;
    use std::path::PathBuf;

    #[test]
    fn test_relevant_events_match_file_name() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/var/log/svc.log"));
        assert!(is_relevant(&event, Some(OsStr::new("svc.log"))));
        assert!(!is_relevant(&event, Some(OsStr::new("other.log"))));
        assert!(!is_relevant(&event, None));
    }

    #[test]
    fn test_access_events_are_ignored() {
        let event = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/var/log/svc.log"));
        assert!(!is_relevant(&event, Some(OsStr::new("svc.log"))));

        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("svc.log"));
        assert!(is_relevant(&event, Some(OsStr::new("svc.log"))));
    }

    #[tokio::test]
    async fn test_subscribe_wakes_on_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("svc.log");
        std::fs::write(&path, "").unwrap();
        let (wake_tx, mut wake_rx) = mpsc::channel(1);

        let notifier = ChangeNotifier::subscribe(&path, wake_tx);
        if !notifier.is_active() {
            // No watcher backend in this environment
            return;
        }

        std::fs::write(&path, "hello\n").unwrap();
        let woke = tokio::time::timeout(std::time::Duration::from_secs(5), wake_rx.recv()).await;
        assert!(matches!(woke, Ok(Some(()))));
    }
}
