//! High score leaderboard
//!
//! Top 5 scores, best first, stored as a JSON array of integers.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    scores: Vec<u64>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "ice-breaker-top-scores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build from arbitrary scores, keeping the best five
    pub fn from_scores(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { scores }
    }

    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.scores.last().is_none_or(|&lowest| score >= lowest)
    }

    /// Add a score. Returns the 1-based rank achieved, or None if it fell
    /// off the end of the list.
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        // Ties rank ahead of existing equal scores
        let pos = self.scores.iter().position(|&s| score >= s).unwrap_or(self.scores.len());
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        self.scores.insert(pos, score);
        self.scores.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Best score, or 0 when empty
    pub fn top_score(&self) -> u64 {
        self.scores.first().copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse stored data. Anything unreadable yields an empty board.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<u64>>(json) {
            Ok(scores) => Self::from_scores(scores),
            Err(e) => {
                log::warn!("Ignoring unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn load(storage: &impl Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} high scores", scores.scores.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to read high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &mut impl Storage) -> Result<(), StorageError> {
        storage.set_item(Self::STORAGE_KEY, &self.to_json()?)?;
        log::info!("High scores saved ({} entries)", self.scores.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_add_score_ranks_and_caps() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add_score(500), Some(1));
        assert_eq!(hs.add_score(900), Some(1));
        assert_eq!(hs.add_score(700), Some(2));
        assert_eq!(hs.add_score(100), Some(4));
        assert_eq!(hs.add_score(300), Some(4));
        assert_eq!(hs.scores(), &[900, 700, 500, 300, 100]);

        // Full: too low
        assert_eq!(hs.add_score(50), None);
        assert!(!hs.qualifies(99));
        // Equal to the lowest still places
        assert!(hs.qualifies(100));
        assert_eq!(hs.add_score(100), Some(5));

        assert_eq!(hs.add_score(800), Some(2));
        assert_eq!(hs.scores(), &[900, 800, 700, 500, 300]);
        assert_eq!(hs.top_score(), 900);
    }

    #[test]
    fn test_json_encoding() {
        let hs = HighScores::from_scores(vec![3, 10, 7]);
        assert_eq!(hs.to_json().unwrap(), "[10,7,3]");
        assert_eq!(HighScores::from_json("[1,2,3,4,5,6]").scores(), &[6, 5, 4, 3, 2]);
        assert!(HighScores::from_json("not json").is_empty());
        assert_eq!(HighScores::new().top_score(), 0);
    }

    #[test]
    fn test_load_save() {
        let mut storage = MemoryStorage::new();
        assert!(HighScores::load(&storage).is_empty());

        let mut hs = HighScores::new();
        hs.add_score(1200);
        hs.add_score(400);
        hs.save(&mut storage).unwrap();

        assert_eq!(
            storage.get_item(HighScores::STORAGE_KEY).unwrap().as_deref(),
            Some("[1200,400]")
        );
        assert_eq!(HighScores::load(&storage), hs);
    }
}
