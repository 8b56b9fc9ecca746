//! LocalStorage access (wasm only)

use web_sys::Storage;

use super::{LEADERBOARD_KEY, ScoreStore, decode_entries, encode_entries};
use crate::error::{Error, Result};
use crate::leaderboard::LeaderboardEntry;

fn storage() -> Result<Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(Error::StorageUnavailable)
}

/// Read a raw string item
pub fn get_item(key: &str) -> Result<Option<String>> {
    storage()?
        .get_item(key)
        .map_err(|e| Error::Storage(format!("get_item({}) failed: {:?}", key, e)))
}

/// Write a raw string item
pub fn set_item(key: &str, value: &str) -> Result<()> {
    storage()?
        .set_item(key, value)
        .map_err(|e| Error::Storage(format!("set_item({}) failed: {:?}", key, e)))
}

/// Leaderboard persisted in the browser's LocalStorage
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(LEADERBOARD_KEY)
    }
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        match get_item(&self.key)? {
            Some(json) => decode_entries(&json),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        let json = encode_entries(entries)?;
        set_item(&self.key, &json)?;
        log::info!("Leaderboard saved ({} entries)", entries.len());
        Ok(())
    }
}
