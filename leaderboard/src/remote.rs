use asteroids_core::{HighscoreEntry, HighscoreList};
use serde::Deserialize;
use serde_json::Value;

use crate::{LeaderboardError, RemoteConfig};

/// Row shape served by the REST table. `ship` is nullable upstream.
#[derive(Debug, Deserialize)]
struct RemoteRow {
    name: String,
    score: u32,
    wave: u32,
    #[serde(default)]
    ship: Option<String>,
}

/// Blocking client for the shared leaderboard table. Every request is
/// bounded by the configured timeout; call it off the frame loop.
#[derive(Debug)]
pub struct RemoteLeaderboard {
    agent: ureq::Agent,
    config: RemoteConfig,
}

impl RemoteLeaderboard {
    pub fn new(config: RemoteConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, self.config.table)
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("apikey", &self.config.api_key)
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
    }

    /// Top `limit` rows by score, malformed rows dropped.
    pub fn fetch_top(&self, limit: usize) -> Result<HighscoreList, LeaderboardError> {
        let request = self
            .agent
            .get(&self.table_url())
            .query("select", "name,score,wave,ship")
            .query("order", "score.desc")
            .query("limit", &limit.to_string());
        let response = self.authorized(request).call()?;

        let body = response
            .into_string()
            .map_err(|e| LeaderboardError::Transport(e.to_string()))?;
        let rows: Vec<Value> = serde_json::from_str(&body)?;
        Ok(parse_rows(rows))
    }

    /// Validates `entry` and inserts it. Nothing is sent for an invalid entry.
    pub fn submit(&self, entry: &HighscoreEntry) -> Result<(), LeaderboardError> {
        entry.validate()?;
        let request = self
            .agent
            .post(&self.table_url())
            .set("Content-Type", "application/json")
            .set("Prefer", "return=minimal");
        self.authorized(request).send_json(entry)?;
        tracing::debug!(name = %entry.name, score = entry.score, "highscore submitted");
        Ok(())
    }
}

/// Converts untyped rows into a validated list. Rows that do not match the
/// schema are skipped individually.
pub fn parse_rows(rows: Vec<Value>) -> HighscoreList {
    let total = rows.len();
    let entries: Vec<HighscoreEntry> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<RemoteRow>(row).ok())
        .map(|row| {
            HighscoreEntry::new(
                &row.name,
                row.score,
                row.wave,
                row.ship.as_deref().unwrap_or(""),
            )
        })
        .collect();
    if entries.len() < total {
        tracing::debug!(
            dropped = total - entries.len(),
            "skipping malformed leaderboard rows"
        );
    }
    HighscoreList::from_rows(entries)
}
