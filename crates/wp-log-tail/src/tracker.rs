//! Tail Tracker registry
//!
//! Owns one watch per registered path. Every watch runs on its own task:
//! - Native mode: `notify` events for the file feed a [`Debouncer`]; settled
//!   changes run [`FileTail::check`]
//! - Degraded mode: file metadata is polled; settled changes run
//!   [`FileTail::check_degraded`]
//!
//! Since a path's task handles one settled change at a time, a new change
//! never races an in-flight read of the same file.

use crate::debounce::Debouncer;
use crate::error::TailError;
use crate::event::{TailEvent, WatchMode};
use crate::file_tail::FileTail;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Timing and backend settings shared by all watches of a tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailConfig {
    /// Quiet period after which a burst of notifications counts as one change
    pub stability_window: Duration,
    /// How often pending changes (or polled metadata) are checked
    pub poll_interval: Duration,
    /// Use metadata polling even when native notifications are available
    pub force_polling: bool,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            stability_window: Duration::from_millis(100),
            poll_interval: Duration::from_millis(100),
            force_polling: false,
        }
    }
}

/// Raw input to a watch task, before debouncing
#[derive(Debug)]
enum Signal {
    Changed,
    Failed(String),
}

/// Handle to a running watch
struct WatchHandle {
    mode: WatchMode,
    signal_tx: mpsc::UnboundedSender<Signal>,
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
    /// Kept alive for as long as the watch runs
    _watcher: Option<RecommendedWatcher>,
}

/// Registry of watched files
///
/// At most one watch exists per resolved path. Events from all watches are
/// delivered on the channel returned by [`TailTracker::new`].
pub struct TailTracker {
    config: TailConfig,
    events: mpsc::UnboundedSender<TailEvent>,
    watches: HashMap<PathBuf, WatchHandle>,
}

impl TailTracker {
    /// Create a tracker and the receiving end of its event channel
    pub fn new(config: TailConfig) -> (Self, mpsc::UnboundedReceiver<TailEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let tracker = Self {
            config,
            events,
            watches: HashMap::new(),
        };
        (tracker, events_rx)
    }

    /// Start watching `path` from its current end
    ///
    /// Falls back to [`WatchMode::Degraded`] when native notifications cannot
    /// be set up for the path. Must be called from within a Tokio runtime.
    pub async fn register(&mut self, path: impl AsRef<Path>) -> Result<WatchMode, TailError> {
        let path = absolute(path.as_ref())?;
        if self.watches.contains_key(&path) {
            return Err(TailError::AlreadyWatching(path));
        }

        let initial_stamp = stamp(&path).await;
        let tail = FileTail::open(&path).await;
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let watcher = if self.config.force_polling {
            None
        } else {
            match native_watcher(&path, signal_tx.clone()) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    log::warn!(
                        "Native watching unavailable for {}, polling instead: {}",
                        path.display(),
                        e
                    );
                    None
                }
            }
        };

        let mode = if watcher.is_some() {
            WatchMode::Native
        } else {
            WatchMode::Degraded
        };

        let task = tokio::spawn(run_watch(
            tail,
            mode,
            initial_stamp,
            self.config.clone(),
            signal_rx,
            stop_rx,
            self.events.clone(),
        ));

        log::info!("Watching {} ({:?})", path.display(), mode);

        self.watches.insert(
            path,
            WatchHandle {
                mode,
                signal_tx,
                stop_tx,
                task,
                _watcher: watcher,
            },
        );

        Ok(mode)
    }

    /// Stop watching `path`
    ///
    /// Returns `false` if the path was not being watched.
    pub async fn unregister(&mut self, path: impl AsRef<Path>) -> bool {
        let Ok(path) = absolute(path.as_ref()) else {
            return false;
        };

        match self.watches.remove(&path) {
            Some(handle) => {
                stop(handle).await;
                log::info!("Stopped watching {}", path.display());
                true
            }
            None => false,
        }
    }

    /// Report a change for `path` as if the filesystem had signalled it
    ///
    /// The change still goes through the debouncer. Returns `false` if the
    /// path is not being watched.
    pub fn notify_changed(&self, path: impl AsRef<Path>) -> bool {
        let Ok(path) = absolute(path.as_ref()) else {
            return false;
        };

        self.watches
            .get(&path)
            .is_some_and(|handle| handle.signal_tx.send(Signal::Changed).is_ok())
    }

    pub fn is_watching(&self, path: impl AsRef<Path>) -> bool {
        absolute(path.as_ref()).is_ok_and(|path| self.watches.contains_key(&path))
    }

    /// Mode of the watch for `path`, if registered
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<WatchMode> {
        let path = absolute(path.as_ref()).ok()?;
        self.watches.get(&path).map(|handle| handle.mode)
    }

    /// Watched paths in no particular order
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.watches.keys().cloned().collect()
    }

    /// Stop every watch and wait for their tasks to finish
    pub async fn shutdown(mut self) {
        let count = self.watches.len();
        for (_, handle) in self.watches.drain() {
            stop(handle).await;
        }
        log::info!("Tail tracker stopped ({} watches closed)", count);
    }
}

async fn stop(handle: WatchHandle) {
    let WatchHandle {
        stop_tx,
        task,
        _watcher,
        ..
    } = handle;

    // Close the native watcher first so no new signals arrive
    drop(_watcher);
    let _ = stop_tx.send(());

    if let Err(e) = task.await {
        log::error!("Watch task ended abnormally: {}", e);
    }
}

/// Resolve `path` to the key its watch is stored under
///
/// Symlinks and `..` are resolved, so aliases of one file share a watch. A
/// file that does not exist is resolved through its parent directory.
fn absolute(path: &Path) -> Result<PathBuf, TailError> {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return Ok(resolved);
    }

    let lexical = std::path::absolute(path).map_err(|e| TailError::io(path, e))?;
    let through_parent = match (lexical.parent(), lexical.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent).ok().map(|p| p.join(name)),
        _ => None,
    };
    Ok(through_parent.unwrap_or(lexical))
}

/// Set up a `notify` watcher on the file's parent directory
///
/// Watching the directory lets us see the file being created or replaced.
fn native_watcher(
    path: &Path,
    signal_tx: mpsc::UnboundedSender<Signal>,
) -> Result<RecommendedWatcher, TailError> {
    let target = path.to_path_buf();
    let file_name = path.file_name().map(|n| n.to_os_string());

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let signal = match res {
            Ok(event) => {
                let relevant = !matches!(event.kind, EventKind::Access(_))
                    && event.paths.iter().any(|p| {
                        p == &target || (file_name.is_some() && p.file_name() == file_name.as_deref())
                    });
                if !relevant {
                    return;
                }
                Signal::Changed
            }
            Err(e) => Signal::Failed(e.to_string()),
        };
        // Receiver gone means the watch is shutting down
        let _ = signal_tx.send(signal);
    })?;

    let watch_dir = path.parent().unwrap_or(path);
    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

    Ok(watcher)
}

/// Size and modification time used to spot changes while polling
type Stamp = Option<(u64, Option<SystemTime>)>;

async fn stamp(path: &Path) -> Stamp {
    tokio::fs::metadata(path)
        .await
        .ok()
        .map(|meta| (meta.len(), meta.modified().ok()))
}

/// Body of one watch task
async fn run_watch(
    mut tail: FileTail,
    mode: WatchMode,
    mut last_stamp: Stamp,
    config: TailConfig,
    mut signal_rx: mpsc::UnboundedReceiver<Signal>,
    mut stop_rx: oneshot::Receiver<()>,
    events: mpsc::UnboundedSender<TailEvent>,
) {
    let path = tail.path().to_path_buf();
    let mut debouncer = Debouncer::new(config.stability_window);
    let mut tick = tokio::time::interval(config.poll_interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            signal = signal_rx.recv() => match signal {
                Some(Signal::Changed) => debouncer.record(&path, Instant::now()),
                Some(Signal::Failed(error)) => {
                    log::warn!("Watcher error for {}: {}", path.display(), error);
                    let event = TailEvent::WatchError { path: path.clone(), error };
                    if events.send(event).is_err() {
                        break;
                    }
                }
                None => break,
            },
            _ = tick.tick() => {
                if mode == WatchMode::Degraded {
                    let current = stamp(&path).await;
                    if current != last_stamp {
                        last_stamp = current;
                        debouncer.record(&path, Instant::now());
                    }
                }

                if debouncer.take_settled(Instant::now()).is_empty() {
                    continue;
                }

                let event = match mode {
                    WatchMode::Native => tail.check().await,
                    WatchMode::Degraded => tail.check_degraded().await,
                };

                if let Some(event) = event {
                    if events.send(event).is_err() {
                        log::debug!("Event receiver dropped, ending watch of {}", path.display());
                        break;
                    }
                }
            }
        }
    }

    log::debug!("Watch task for {} finished", path.display());
}
