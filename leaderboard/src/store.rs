use std::{
    fs, io,
    path::{Path, PathBuf},
};

use asteroids_core::HighscoreList;
use serde_json::Value;

use crate::remote::parse_rows;
use crate::LeaderboardError;

/// The on-disk top-ten: a JSON array of rows in one file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored list. A missing file or one that is not a JSON array
    /// yields an empty list; rows of the wrong shape or failing validation are
    /// dropped one by one.
    pub fn load(&self) -> HighscoreList {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HighscoreList::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read highscores: {e}");
                return HighscoreList::new();
            }
        };

        match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(rows) => parse_rows(rows),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt highscore file: {e}");
                HighscoreList::new()
            }
        }
    }

    /// Replaces the stored list. Writes a sibling temp file and renames it
    /// over the target so readers never see a partial file.
    pub fn save(&self, list: &HighscoreList) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let body = serde_json::to_vec_pretty(list)?;
        let temp = self.temp_path();
        fs::write(&temp, body).map_err(|e| io_error(&temp, e))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(io_error(&self.path, e));
        }
        tracing::debug!(path = %self.path.display(), rows = list.len(), "highscores saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path, source: io::Error) -> LeaderboardError {
    LeaderboardError::Io {
        path: path.to_path_buf(),
        source,
    }
}
