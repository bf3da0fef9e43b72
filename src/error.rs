//! Error types for game setup, turn handling and persistence.

use std::fmt;

use crate::{MAX_PLAYERS, MIN_PLAYERS};

/// Errors raised by the game controller and board construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Requested player count is outside `MIN_PLAYERS..=MAX_PLAYERS`.
    InvalidPlayerCount(usize),
    /// A roll was requested while no session is live.
    NoActiveGame,
    /// A roll was requested after someone already won.
    GameFinished,
    /// A hazard layout breaks the board invariants.
    InvalidHazard {
        /// Start cell of the offending hazard.
        start: u8,
        /// End cell of the offending hazard.
        end: u8,
        /// Which rule it breaks.
        reason: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Shown verbatim to the player on the start screen.
            GameError::InvalidPlayerCount(_) => write!(
                f,
                "Please select between {MIN_PLAYERS} and {MAX_PLAYERS} players!"
            ),
            GameError::NoActiveGame => write!(f, "no game in progress"),
            GameError::GameFinished => write!(f, "game is already over"),
            GameError::InvalidHazard { start, end, reason } => {
                write!(f, "invalid hazard {start}->{end}: {reason}")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Failures of the key-value backend behind the score store.
///
/// These never leave the store: callers log them and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backend could not be reached (e.g. `localStorage` disabled).
    Unavailable(String),
    /// Reading a key failed.
    Read { key: String, detail: String },
    /// Writing a key failed (quota, private mode, ...).
    Write { key: String, detail: String },
    /// Stored value exists but is not valid JSON for the expected shape.
    Malformed { key: String, detail: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(detail) => write!(f, "storage unavailable: {detail}"),
            StorageError::Read { key, detail } => write!(f, "failed to read '{key}': {detail}"),
            StorageError::Write { key, detail } => write!(f, "failed to write '{key}': {detail}"),
            StorageError::Malformed { key, detail } => {
                write!(f, "malformed data under '{key}': {detail}")
            }
        }
    }
}

impl std::error::Error for StorageError {}
