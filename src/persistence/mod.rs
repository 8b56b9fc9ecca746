//! Leaderboard persistence
//!
//! Features:
//! - `ScoreStore` trait so the session never touches browser globals
//! - JSON array format: `[{"initials":"ABC","score":12}, ...]`
//! - In-memory store for native builds and tests
//! - LocalStorage store on the web

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::error::Result;
use crate::leaderboard::LeaderboardEntry;

/// LocalStorage key for the leaderboard
pub const LEADERBOARD_KEY: &str = "flappy_leaderboard";

/// Where leaderboard entries live between sessions
pub trait ScoreStore {
    /// Read all stored entries; an absent board is `Ok(vec![])`
    fn load(&self) -> Result<Vec<LeaderboardEntry>>;
    /// Replace the stored board
    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()>;
}

/// Parse the stored JSON, treating empty input as an empty board
pub fn decode_entries(json: &str) -> Result<Vec<LeaderboardEntry>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(json)?)
}

pub fn encode_entries(entries: &[LeaderboardEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Store that keeps the serialized board in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
    /// Number of successful saves
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored JSON (used to test corrupt data)
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
            saves: 0,
        }
    }

    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        match &self.json {
            Some(json) => decode_entries(json),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        self.json = Some(encode_entries(entries)?);
        self.saves += 1;
        Ok(())
    }
}
