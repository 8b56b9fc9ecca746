//! Error types
//!
//! The simulation itself cannot fail. Errors come from leaderboard entry
//! (player-typed initials) and from browser storage.

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Initials must be 1-3 letters or digits after normalization
    InvalidInitials(String),
    /// Initials were submitted but no high score is waiting for them
    NoPendingEntry,
    /// Stored JSON could not be read or written
    Serialization(serde_json::Error),
    /// LocalStorage is not available (private mode, native build)
    StorageUnavailable,
    /// A storage call was rejected by the browser
    Storage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInitials(input) => write!(
                f,
                "invalid initials {:?}: enter 1-3 letters or numbers",
                input
            ),
            Error::NoPendingEntry => write!(f, "no high score is waiting for initials"),
            Error::Serialization(e) => write!(f, "leaderboard data is malformed: {}", e),
            Error::StorageUnavailable => write!(f, "local storage is not available"),
            Error::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
