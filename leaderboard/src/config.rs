use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_TABLE: &str = "highscores";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CACHE_SECS: u64 = 30;
pub const DEFAULT_HIGHSCORE_FILE: &str = "asteroids_top10.json";

/// Where the shared leaderboard lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardConfig {
    /// `None` runs offline-only against the local file.
    pub remote: Option<RemoteConfig>,
    /// A non-forced fetch inside this window is skipped.
    pub cache_window: Duration,
    pub highscore_file: PathBuf,
}

impl LeaderboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`LeaderboardConfig::from_env`] with an injectable variable
    /// source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = read_var_string(&lookup, "LEADERBOARD_URL");
        let api_key = read_var_string(&lookup, "LEADERBOARD_API_KEY");

        let remote = match (base_url, api_key) {
            (Some(base_url), Some(api_key)) => Some(RemoteConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                table: read_var_string(&lookup, "LEADERBOARD_TABLE")
                    .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                timeout: Duration::from_millis(read_var_u64(
                    &lookup,
                    "LEADERBOARD_TIMEOUT_MS",
                    DEFAULT_TIMEOUT_MS,
                )),
            }),
            (Some(_), None) => {
                tracing::warn!(
                    "LEADERBOARD_URL is set but LEADERBOARD_API_KEY is not. Running offline."
                );
                None
            }
            (None, Some(_)) => {
                tracing::warn!("LEADERBOARD_API_KEY is set without LEADERBOARD_URL. Ignoring it.");
                None
            }
            (None, None) => None,
        };

        Self {
            remote,
            cache_window: Duration::from_secs(read_var_u64_allow_zero(
                &lookup,
                "LEADERBOARD_CACHE_SECS",
                DEFAULT_CACHE_SECS,
            )),
            highscore_file: read_var_string(&lookup, "HIGHSCORE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HIGHSCORE_FILE)),
        }
    }

    pub fn offline(highscore_file: impl Into<PathBuf>) -> Self {
        Self {
            remote: None,
            cache_window: Duration::from_secs(DEFAULT_CACHE_SECS),
            highscore_file: highscore_file.into(),
        }
    }
}

fn read_var_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_var_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    match parse_var_u64(lookup, name) {
        Some(0) => {
            tracing::warn!("{name} must be positive. Using default {default}.");
            default
        }
        Some(value) => value,
        None => default,
    }
}

fn read_var_u64_allow_zero(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> u64 {
    parse_var_u64(lookup, name).unwrap_or(default)
}

fn parse_var_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = read_var_string(lookup, name)?;
    match raw.parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{name}={raw:?} is not a number ({e}). Using the default.");
            None
        }
    }
}
