//! The top-ten table shared by the local store, the remote leaderboard and
//! the name-entry screen.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_HIGHSCORES, MAX_SHIP_TAG_LEN, NAME_LENGTH};
use crate::error::EntryError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub name: String,
    pub score: u32,
    pub wave: u32,
    #[serde(default)]
    pub ship: String,
}

impl HighscoreEntry {
    pub fn new(name: &str, score: u32, wave: u32, ship: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            score,
            wave,
            ship: ship.to_string(),
        }
    }

    /// Row schema enforced on everything read from disk or the network and
    /// on every submission.
    pub fn validate(&self) -> Result<(), EntryError> {
        let length = self.name.chars().count();
        if length != NAME_LENGTH {
            return Err(EntryError::NameLength {
                actual: length,
                expected: NAME_LENGTH,
            });
        }
        if let Some(found) = self
            .name
            .chars()
            .find(|c| !(c.is_ascii_uppercase() || *c == ' '))
        {
            return Err(EntryError::NameCharacter { found });
        }
        if self.name.trim().is_empty() {
            return Err(EntryError::BlankName);
        }
        if self.score == 0 {
            return Err(EntryError::ZeroScore);
        }
        if self.wave == 0 {
            return Err(EntryError::ZeroWave);
        }
        let ship_len = self.ship.chars().count();
        if ship_len > MAX_SHIP_TAG_LEN {
            return Err(EntryError::ShipTagTooLong {
                actual: ship_len,
                max: MAX_SHIP_TAG_LEN,
            });
        }
        Ok(())
    }
}

/// Sorted descending by score, never longer than [`MAX_HIGHSCORES`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HighscoreList {
    entries: Vec<HighscoreEntry>,
}

impl HighscoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from untrusted rows, dropping the ones that fail
    /// validation rather than rejecting the whole set.
    pub fn from_rows(rows: impl IntoIterator<Item = HighscoreEntry>) -> Self {
        let mut entries: Vec<HighscoreEntry> = rows
            .into_iter()
            .filter(|row| match row.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::debug!(
                        name = %row.name,
                        score = row.score,
                        "dropping highscore row: {err}"
                    );
                    false
                }
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGHSCORES);
        Self { entries }
    }

    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> u32 {
        self.entries.first().map_or(0, |entry| entry.score)
    }

    /// A score equal to the current tenth place does not qualify.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        match self.entries.get(MAX_HIGHSCORES - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Zero-based position `score` would take if inserted now, or `None`
    /// if it would fall off the table.
    pub fn rank_of(&self, score: u32) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .take_while(|entry| entry.score >= score)
            .count();
        (rank < MAX_HIGHSCORES).then_some(rank)
    }

    /// Inserts one entry, keeping ties in arrival order, and returns the rank
    /// it landed at (`None` if it was cut).
    pub fn insert(&mut self, name: &str, score: u32, wave: u32, ship: &str) -> Option<usize> {
        let entry = HighscoreEntry::new(name, score, wave, ship);
        let rank = self.rank_of(score);
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGHSCORES);
        rank
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].score >= pair[1].score)
    }

    pub fn into_vec(self) -> Vec<HighscoreEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_list(min: u32) -> HighscoreList {
        let mut list = HighscoreList::new();
        for i in 0..MAX_HIGHSCORES as u32 {
            list.insert("PILOT", min + i * 100, 3, "THE WAVE");
        }
        list
    }

    #[test]
    fn qualification_boundary() {
        let list = full_list(500);
        assert!(!list.qualifies(500));
        assert!(list.qualifies(501));
        assert!(!HighscoreList::new().qualifies(0));
        assert!(HighscoreList::new().qualifies(1));
    }

    #[test]
    fn insert_keeps_order_and_cap() {
        let mut list = full_list(500);
        assert_eq!(list.insert("ace", 950, 4, "TERMINATOR"), Some(5));
        assert_eq!(list.len(), MAX_HIGHSCORES);
        assert!(list.is_sorted());
        assert_eq!(list.entries()[5].name, "ACE");
        assert_eq!(list.entries().last().map(|e| e.score), Some(600));
    }

    #[test]
    fn ties_go_after_existing_entries() {
        let mut list = HighscoreList::new();
        list.insert("FIRST", 300, 1, "");
        list.insert("SECND", 300, 2, "");
        assert_eq!(list.entries()[0].name, "FIRST");
        assert_eq!(list.rank_of(300), Some(2));
    }

    #[test]
    fn rank_of_full_table() {
        let list = full_list(500);
        assert_eq!(list.rank_of(10_000), Some(0));
        assert_eq!(list.rank_of(500), None);
        assert_eq!(list.top_score(), 1_400);
    }

    #[test]
    fn validation_rules() {
        let ok = HighscoreEntry::new("ab cd", 10, 1, "THE WAVE");
        assert_eq!(ok.validate(), Ok(()));

        let cases = [
            (HighscoreEntry::new("ABCD", 10, 1, ""), "length"),
            (HighscoreEntry::new("AB1CD", 10, 1, ""), "character"),
            (HighscoreEntry::new("     ", 10, 1, ""), "blank"),
            (HighscoreEntry::new("ABCDE", 0, 1, ""), "score"),
            (HighscoreEntry::new("ABCDE", 10, 0, ""), "wave"),
            (HighscoreEntry::new("ABCDE", 10, 1, "A VERY LONG SHIP TAG"), "ship"),
        ];
        for (entry, label) in cases {
            assert!(entry.validate().is_err(), "{label} should be rejected");
        }
    }

    #[test]
    fn from_rows_filters_and_sorts() {
        let rows = vec![
            HighscoreEntry::new("LOWER", 100, 1, ""),
            HighscoreEntry::new("BAD", 900, 1, ""),
            HighscoreEntry::new("UPPER", 800, 5, "INTERSTELLAR"),
        ];
        let list = HighscoreList::from_rows(rows);
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries()[0].name, "UPPER");
        assert!(list.is_sorted());
    }

    #[test]
    fn ship_tag_defaults_when_absent() {
        let entry: HighscoreEntry =
            serde_json::from_str(r#"{"name":"ABCDE","score":5,"wave":2}"#).expect("row parses");
        assert_eq!(entry.ship, "");
    }
}
