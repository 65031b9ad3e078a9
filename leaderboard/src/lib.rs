//! Highscore persistence and the shared REST leaderboard. The game session
//! never waits on anything here: it emits requests and receives snapshots.

mod config;
mod error;
mod remote;
mod store;
mod sync;

pub use config::{
    LeaderboardConfig, RemoteConfig, DEFAULT_CACHE_SECS, DEFAULT_HIGHSCORE_FILE, DEFAULT_TABLE,
    DEFAULT_TIMEOUT_MS,
};
pub use error::LeaderboardError;
pub use remote::{parse_rows, RemoteLeaderboard};
pub use store::LocalStore;
pub use sync::{LeaderboardSync, SyncUpdate};
