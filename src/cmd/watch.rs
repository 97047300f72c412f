//! Polling file watcher and shutdown signal handling for `exec --watch`.

use std::{
    io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use tokio::{
    signal,
    time::{Interval, MissedTickBehavior},
};

/// How often watched files are checked.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Detects changes to a fixed set of files by comparing modification times.
pub struct FileWatcher {
    files: Vec<(PathBuf, Option<SystemTime>)>,
    ticker: Interval,
}

impl FileWatcher {
    /// Starts watching `paths`, polling every `period`. Must be called from
    /// within a Tokio runtime.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, period: Duration) -> Self {
        let files = paths
            .into_iter()
            .map(|path| {
                let modified = modified_at(&path);
                (path, modified)
            })
            .collect();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { files, ticker }
    }

    /// Returns the files whose modification time changed since the last
    /// check. A file that appears or disappears counts as changed.
    pub fn poll_changes(&mut self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for (path, last_seen) in &mut self.files {
            let current = modified_at(path);
            if current != *last_seen {
                *last_seen = current;
                changed.push(path.clone());
            }
        }
        changed
    }

    /// Waits until at least one watched file changes.
    pub async fn changed(&mut self) -> Vec<PathBuf> {
        loop {
            self.ticker.tick().await;
            let changed = self.poll_changes();
            if !changed.is_empty() {
                return changed;
            }
        }
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

/// Completes on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                tracing::info!("SIGINT (Ctrl+C) received, stopping watch.");
                result
            }
            _ = terminate.recv() => {
                tracing::info!("SIGTERM received, stopping watch.");
                Ok(())
            }
        }
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c().await
    }
}
