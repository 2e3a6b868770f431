//! High score leaderboard
//!
//! Stored inside the settings file as a list of `[name, score]` pairs, kept
//! sorted descending and capped at 10 entries.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u32)", into = "(String, u32)")]
pub struct HighScoreEntry {
    /// Player nick
    pub name: String,
    pub score: u32,
}

impl From<(String, u32)> for HighScoreEntry {
    fn from((name, score): (String, u32)) -> Self {
        Self { name, score }
    }
}

impl From<HighScoreEntry> for (String, u32) {
    fn from(entry: HighScoreEntry) -> Self {
        (entry.name, entry.score)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard.
    /// Any score does while the table has free slots.
    pub fn qualifies(&self, score: u32) -> bool {
        match self.entries.get(MAX_HIGH_SCORES - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Insert a score and keep the table sorted and capped.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add_score(&mut self, name: &str, score: u32) -> Option<usize> {
        // Equal scores keep their arrival order
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            HighScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Sort descending and drop everything past the 10th entry
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Entry at a 0-based slot; slots past the table are empty
    pub fn get(&self, slot: usize) -> Option<&HighScoreEntry> {
        self.entries.get(slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}
