use std::{fmt, io, path::PathBuf};

use asteroids_core::EntryError;

#[derive(Debug)]
pub enum LeaderboardError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    /// The server answered with a non-success status.
    Http { status: u16, body: String },
    /// Connection, DNS, TLS or timeout failure.
    Transport(String),
    Invalid(EntryError),
    WorkerSpawn(io::Error),
    WorkerGone,
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "malformed leaderboard json: {err}"),
            Self::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            Self::Transport(msg) => write!(f, "network error: {msg}"),
            Self::Invalid(err) => write!(f, "invalid highscore entry: {err}"),
            Self::WorkerSpawn(err) => write!(f, "failed to start leaderboard worker: {err}"),
            Self::WorkerGone => write!(f, "leaderboard worker has stopped"),
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::WorkerSpawn(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<EntryError> for LeaderboardError {
    fn from(err: EntryError) -> Self {
        Self::Invalid(err)
    }
}

impl From<ureq::Error> for LeaderboardError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => Self::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}
