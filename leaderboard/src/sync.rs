use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use asteroids_core::{constants::MAX_HIGHSCORES, HighscoreEntry, HighscoreList, LeaderboardRequest};

use crate::{LeaderboardConfig, LeaderboardError, LocalStore, RemoteLeaderboard};

/// A leaderboard snapshot ready to hand to the game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpdate {
    pub highscores: HighscoreList,
    /// `true` when the rows came from the local file because the remote was
    /// unreachable or not configured.
    pub offline: bool,
}

enum Command {
    Fetch { force: bool },
    Submit(HighscoreEntry),
    Shutdown,
}

/// Owns the leaderboard worker thread. All network traffic happens there;
/// the frame loop only sends commands and polls for snapshots.
pub struct LeaderboardSync {
    store: LocalStore,
    commands: Sender<Command>,
    updates: Receiver<SyncUpdate>,
    worker: Option<JoinHandle<()>>,
}

impl LeaderboardSync {
    pub fn spawn(config: &LeaderboardConfig) -> Result<Self, LeaderboardError> {
        let store = LocalStore::open(&config.highscore_file);
        let worker = Worker {
            remote: config.remote.clone().map(RemoteLeaderboard::new),
            store: store.clone(),
            cache_window: config.cache_window,
            last_fetch: None,
            cached_rows: 0,
        };

        let (command_tx, command_rx) = mpsc::channel();
        let (update_tx, update_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("leaderboard-sync".to_string())
            .spawn(move || worker.run(command_rx, update_tx))
            .map_err(LeaderboardError::WorkerSpawn)?;

        tracing::info!(
            remote = config.remote.is_some(),
            file = %config.highscore_file.display(),
            "leaderboard sync started"
        );
        Ok(Self {
            store,
            commands: command_tx,
            updates: update_rx,
            worker: Some(handle),
        })
    }

    pub fn local_store(&self) -> &LocalStore {
        &self.store
    }

    /// Asks for a fresh snapshot. A non-forced request inside the cache
    /// window is dropped by the worker.
    pub fn request_fetch(&self, force: bool) -> Result<(), LeaderboardError> {
        self.send(Command::Fetch { force })
    }

    /// Queues a remote insert followed by a forced refetch. The local file is
    /// not touched here.
    pub fn submit(&self, entry: HighscoreEntry) -> Result<(), LeaderboardError> {
        self.send(Command::Submit(entry))
    }

    /// Serves one request drained from the game session. `current` is the
    /// session's list, which already contains a submitted entry and is
    /// persisted locally before the remote call.
    pub fn handle(
        &self,
        request: LeaderboardRequest,
        current: &HighscoreList,
    ) -> Result<(), LeaderboardError> {
        match request {
            LeaderboardRequest::Fetch => self.request_fetch(false),
            LeaderboardRequest::Submit(entry) => {
                if let Err(err) = self.store.save(current) {
                    tracing::warn!("failed to save highscores locally: {err}");
                }
                self.submit(entry)
            }
        }
    }

    /// Latest snapshot produced since the previous poll, without blocking.
    pub fn poll(&self) -> Option<SyncUpdate> {
        self.updates.try_iter().last()
    }

    /// Blocks up to `timeout` for the next snapshot.
    pub fn wait(&self, timeout: Duration) -> Option<SyncUpdate> {
        self.updates.recv_timeout(timeout).ok()
    }

    fn send(&self, command: Command) -> Result<(), LeaderboardError> {
        self.commands
            .send(command)
            .map_err(|_| LeaderboardError::WorkerGone)
    }
}

impl Drop for LeaderboardSync {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("leaderboard worker panicked");
            }
        }
    }
}

struct Worker {
    remote: Option<RemoteLeaderboard>,
    store: LocalStore,
    cache_window: Duration,
    last_fetch: Option<Instant>,
    cached_rows: usize,
}

impl Worker {
    fn run(mut self, commands: Receiver<Command>, updates: Sender<SyncUpdate>) {
        for command in commands {
            let update = match command {
                Command::Fetch { force } => self.fetch(force),
                Command::Submit(entry) => {
                    self.submit(&entry);
                    self.fetch(true)
                }
                Command::Shutdown => break,
            };
            if let Some(update) = update {
                if updates.send(update).is_err() {
                    break;
                }
            }
        }
        tracing::debug!("leaderboard worker stopped");
    }

    fn is_fresh(&self) -> bool {
        self.cached_rows > 0
            && self
                .last_fetch
                .is_some_and(|at| at.elapsed() < self.cache_window)
    }

    fn fetch(&mut self, force: bool) -> Option<SyncUpdate> {
        if !force && self.is_fresh() {
            tracing::trace!("leaderboard cache still fresh");
            return None;
        }

        let Some(remote) = &self.remote else {
            return Some(self.local_fallback());
        };

        match remote.fetch_top(MAX_HIGHSCORES) {
            Ok(highscores) => {
                if let Err(err) = self.store.save(&highscores) {
                    tracing::warn!("failed to cache leaderboard locally: {err}");
                }
                self.last_fetch = Some(Instant::now());
                self.cached_rows = highscores.len();
                tracing::debug!(rows = highscores.len(), "leaderboard fetched");
                Some(SyncUpdate {
                    highscores,
                    offline: false,
                })
            }
            Err(err) => {
                tracing::warn!("leaderboard fetch failed, using local cache: {err}");
                Some(self.local_fallback())
            }
        }
    }

    fn local_fallback(&mut self) -> SyncUpdate {
        let highscores = self.store.load();
        self.cached_rows = highscores.len();
        SyncUpdate {
            highscores,
            offline: true,
        }
    }

    fn submit(&mut self, entry: &HighscoreEntry) {
        if let Some(remote) = &self.remote {
            if let Err(err) = remote.submit(entry) {
                tracing::warn!(name = %entry.name, score = entry.score, "score submit failed: {err}");
            }
        }
        self.last_fetch = None;
    }
}
