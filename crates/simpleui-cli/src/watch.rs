//! Regenerate when the input file changes.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::generate::input_dir;

/// Quiet period that ends a burst of events (editors often write, truncate
/// and rename in quick succession).
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// What happened to the watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed,
    Removed,
    Error(String),
}

/// Watches one file through its parent directory, so replace-by-rename
/// saves are seen too.
pub struct FileWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    receiver: Receiver<WatchEvent>,
}

impl FileWatcher {
    pub fn new(path: impl Into<PathBuf>) -> notify::Result<Self> {
        let path = path.into();
        let target = path.file_name().map(OsStr::to_os_string);
        let (tx, rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Some(event) = classify(res, target.as_deref()) {
                let _ = tx.send(event);
            }
        })?;
        watcher.watch(&input_dir(&path), RecursiveMode::NonRecursive)?;

        Ok(Self { path, _watcher: watcher, receiver: rx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the file is touched, then absorb the rest of the burst.
    /// `None` once the underlying watcher has shut down.
    pub fn next_event(&self) -> Option<WatchEvent> {
        let mut event = self.receiver.recv().ok()?;
        loop {
            match self.receiver.recv_timeout(DEBOUNCE) {
                Ok(next) => event = settle(event, next),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return Some(event);
                }
            }
        }
    }
}

/// Map a raw notification to an event about the file named `target`.
fn classify(res: notify::Result<Event>, target: Option<&OsStr>) -> Option<WatchEvent> {
    let event = match res {
        Ok(event) => event,
        Err(err) => return Some(WatchEvent::Error(err.to_string())),
    };
    if !event.paths.iter().any(|p| p.file_name() == target) {
        return None;
    }
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed),
        EventKind::Remove(_) => Some(WatchEvent::Removed),
        _ => None,
    }
}

/// The outcome of a burst is its last file event; errors never mask one.
fn settle(current: WatchEvent, next: WatchEvent) -> WatchEvent {
    match next {
        WatchEvent::Error(_) if current != WatchEvent::Removed => current,
        next => next,
    }
}

/// Call `on_change` each time the watched file changes. Errors are logged
/// and watching continues.
pub fn watch(watcher: FileWatcher, mut on_change: impl FnMut()) {
    log::info!("watching {} for changes", watcher.path().display());
    while let Some(event) = watcher.next_event() {
        match event {
            WatchEvent::Changed => {
                log::info!("{} changed, regenerating", watcher.path().display());
                on_change();
            }
            WatchEvent::Removed => {
                log::warn!("{} was removed; waiting for it to reappear", watcher.path().display());
            }
            WatchEvent::Error(msg) => log::warn!("watch error: {msg}"),
        }
    }
    log::warn!("stopped watching {}", watcher.path().display());
}
