//! High score leaderboard
//!
//! Top 10 (initials, score) pairs, best first. Storage lives behind
//! [`crate::persistence::ScoreStore`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Maximum initials length
pub const MAX_INITIALS: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub initials: String,
    pub score: u32,
}

/// Validated player initials: 1-3 characters of `[A-Z0-9]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initials(String);

impl Initials {
    /// Uppercase the input, keep the first three characters, then validate
    pub fn parse(input: &str) -> Result<Self> {
        let normalized: String = input.to_uppercase().chars().take(MAX_INITIALS).collect();
        let valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if valid {
            Ok(Self(normalized))
        } else {
            Err(Error::InvalidInitials(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from stored entries (sorted and trimmed in case storage was edited)
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Check if a score would make the board
    pub fn is_high_score(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Top score, or 0 for an empty board
    pub fn best_score(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Insert a score and trim to the top 10.
    /// Returns the rank achieved (1-indexed) or None if it fell off the board.
    pub fn submit(&mut self, initials: &Initials, score: u32) -> Option<usize> {
        let entry = LeaderboardEntry {
            initials: initials.as_str().to_string(),
            score,
        };

        // Equal scores keep the older entry first
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initials(s: &str) -> Initials {
        Initials::parse(s).unwrap()
    }

    #[test]
    fn test_initials_normalized() {
        assert_eq!(initials("abc").as_str(), "ABC");
        assert_eq!(initials("a1").as_str(), "A1");
        assert_eq!(initials("7").as_str(), "7");
        // Extra characters are cut before validation
        assert_eq!(initials("abcd!").as_str(), "ABC");
    }

    #[test]
    fn test_initials_rejected() {
        for bad in ["", "a b", "!", "é", "-1"] {
            assert!(
                matches!(Initials::parse(bad), Err(Error::InvalidInitials(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_empty_board() {
        let lb = Leaderboard::new();
        assert!(lb.is_empty());
        assert_eq!(lb.best_score(), 0);
        assert!(lb.is_high_score(0));
        assert!(lb.top(10).is_empty());
    }

    #[test]
    fn test_submit_keeps_top_ten_of_eleven() {
        let mut lb = Leaderboard::new();
        for score in [5, 12, 1, 30, 7, 18, 2, 9, 25, 14, 3] {
            lb.submit(&initials("AAA"), score);
        }
        assert_eq!(lb.len(), MAX_HIGH_SCORES);
        let scores: Vec<u32> = lb.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 25, 18, 14, 12, 9, 7, 5, 3, 2]);
        assert_eq!(lb.best_score(), 30);
    }

    #[test]
    fn test_is_high_score_on_full_board() {
        let mut lb = Leaderboard::new();
        for score in 1..=10 {
            assert!(lb.is_high_score(0));
            lb.submit(&initials("ZZ"), score * 10);
        }
        // 10th place is 10
        assert!(!lb.is_high_score(5));
        assert!(!lb.is_high_score(10));
        assert!(lb.is_high_score(11));
    }

    #[test]
    fn test_submit_rank() {
        let mut lb = Leaderboard::new();
        assert_eq!(lb.submit(&initials("A"), 10), Some(1));
        assert_eq!(lb.submit(&initials("B"), 20), Some(1));
        assert_eq!(lb.submit(&initials("C"), 15), Some(2));
        assert_eq!(lb.submit(&initials("D"), 15), Some(3));
        assert_eq!(lb.entries()[1].initials, "C");

        for _ in 0..10 {
            lb.submit(&initials("X"), 100);
        }
        assert_eq!(lb.submit(&initials("E"), 1), None);
        assert!(lb.entries().iter().all(|e| e.score == 100));
    }

    #[test]
    fn test_top_n() {
        let mut lb = Leaderboard::new();
        for score in [3, 1, 2] {
            lb.submit(&initials("Q"), score);
        }
        assert_eq!(lb.top(2).len(), 2);
        assert_eq!(lb.top(2)[0].score, 3);
        assert_eq!(lb.top(50).len(), 3);
    }

    #[test]
    fn test_from_entries_sorts_and_trims() {
        let entries = (0..15)
            .map(|i| LeaderboardEntry {
                initials: "AB".to_string(),
                score: i,
            })
            .collect();
        let lb = Leaderboard::from_entries(entries);
        assert_eq!(lb.len(), 10);
        assert_eq!(lb.best_score(), 14);
        assert_eq!(lb.entries().last().map(|e| e.score), Some(5));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = LeaderboardEntry {
            initials: "ABC".to_string(),
            score: 12,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"initials":"ABC","score":12}"#
        );
    }
}
