//! Score and game-history persistence.
//!
//! Scores (`{highScore, gamesPlayed}` per player id) and the last
//! [`HISTORY_LIMIT`] finished games are kept as JSON under two keys of a
//! key-value backend. In the browser that is `localStorage`; tests use
//! [`MemoryStorage`].
//!
//! Storage trouble never reaches gameplay: read failures and malformed JSON
//! load as empty defaults, write failures are logged and the in-memory state
//! carries on.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::engine::{Player, PlayerId, ScoreSink};
use crate::error::StorageError;

pub const SCORES_KEY: &str = "snakesAndLadders_scores";
pub const HISTORY_KEY: &str = "snakesAndLadders_history";
/// Finished games kept in history, newest first.
pub const HISTORY_LIMIT: usize = 10;

/// Minimal string key-value store.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// In-process backend. `read_only` makes every write fail and `unreadable`
/// makes every read fail, for exercising the error paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    read_only: bool,
    unreadable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::default()
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unreadable {
            return Err(StorageError::Read {
                key: key.to_owned(),
                detail: "backend is unreadable".to_owned(),
            });
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Write {
                key: key.to_owned(),
                detail: "backend is read-only".to_owned(),
            });
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Browser `localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let win = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = win
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl StorageBackend for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_owned(),
            detail: format!("{e:?}"),
        })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                detail: format!("{e:?}"),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    #[serde(default)]
    pub high_score: u8,
    #[serde(default)]
    pub games_played: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    #[serde(default)]
    pub color: String,
    pub final_position: u8,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            color: p.color.to_owned(),
            final_position: p.position,
        }
    }
}

/// One finished game. `timestamp` is milliseconds since the Unix epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: u64,
    pub winner: PlayerSnapshot,
    pub players: Vec<PlayerSnapshot>,
}

/// Wall clock in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| (p.time_origin() + p.now()) as u64)
        .unwrap_or(0)
}

/// Wall clock in milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub struct ScoreStore<B> {
    backend: B,
    scores: BTreeMap<PlayerId, ScoreRecord>,
    clock: fn() -> u64,
}

impl<B: StorageBackend> ScoreStore<B> {
    /// Load scores from `backend`. Missing or unreadable data starts empty.
    pub fn open(backend: B) -> Self {
        Self::with_clock(backend, now_ms)
    }

    pub fn with_clock(backend: B, clock: fn() -> u64) -> Self {
        let scores = load_json(&backend, SCORES_KEY).unwrap_or_default();
        Self {
            backend,
            scores,
            clock,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Best cell ever reached by `player`; 0 if unknown.
    pub fn high_score(&self, player: PlayerId) -> u8 {
        self.scores.get(&player).map_or(0, |r| r.high_score)
    }

    pub fn games_played(&self, player: PlayerId) -> u32 {
        self.scores.get(&player).map_or(0, |r| r.games_played)
    }

    /// Raise `player`'s high score to `position` if it is higher. Returns
    /// whether it was raised. Only persists on change.
    pub fn record_position(&mut self, player: PlayerId, position: u8) -> bool {
        let record = self.scores.entry(player).or_default();
        if position <= record.high_score {
            return false;
        }
        record.high_score = position;
        self.save_scores();
        true
    }

    /// Prepend a finished game to history (capped) and count it for the winner.
    pub fn record_game_result(&mut self, winner: &Player, players: &[Player]) {
        let entry = HistoryEntry {
            timestamp: (self.clock)(),
            winner: PlayerSnapshot::from(winner),
            players: players.iter().map(PlayerSnapshot::from).collect(),
        };
        let mut history = self.history();
        history.insert(0, entry);
        history.truncate(HISTORY_LIMIT);
        match serde_json::to_string(&history) {
            Ok(json) => self.persist(HISTORY_KEY, &json),
            Err(err) => log::error!("Error saving game history: {err}"),
        }

        if let Some(record) = self.scores.get_mut(&winner.id) {
            record.games_played += 1;
            self.save_scores();
        }
    }

    /// Stored history, newest first. Empty when absent or unreadable.
    pub fn history(&self) -> Vec<HistoryEntry> {
        load_json(&self.backend, HISTORY_KEY).unwrap_or_default()
    }

    fn save_scores(&mut self) {
        match serde_json::to_string(&self.scores) {
            Ok(json) => self.persist(SCORES_KEY, &json),
            Err(err) => log::error!("Error saving scores: {err}"),
        }
    }

    fn persist(&mut self, key: &str, json: &str) {
        if let Err(err) = self.backend.write(key, json) {
            log::error!("{err}");
        }
    }
}

impl<B: StorageBackend> ScoreSink for ScoreStore<B> {
    fn record_position(&mut self, player: PlayerId, position: u8) -> bool {
        ScoreStore::record_position(self, player, position)
    }

    fn record_game_result(&mut self, winner: &Player, players: &[Player]) {
        ScoreStore::record_game_result(self, winner, players);
    }
}

/// Read and parse `key`. Absent data is `None`; failures are logged and also `None`.
fn load_json<T, B>(backend: &B, key: &str) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
    B: StorageBackend + ?Sized,
{
    let raw = match backend.read(key) {
        Ok(raw) => raw?,
        Err(err) => {
            log::error!("{err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            let err = StorageError::Malformed {
                key: key.to_owned(),
                detail: err.to_string(),
            };
            log::warn!("{err}; starting fresh");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_clock() -> u64 {
        1_700_000_000_000
    }

    fn player(id: PlayerId, position: u8) -> Player {
        Player {
            id,
            color: "#FF4444",
            position,
            high_score: position,
        }
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut store = ScoreStore::with_clock(MemoryStorage::new(), fixed_clock);
        assert!(store.record_position(0, 40));
        assert!(!store.record_position(0, 12));
        assert!(!store.record_position(0, 40));
        assert_eq!(store.high_score(0), 40);
        assert_eq!(store.high_score(3), 0);
    }

    #[test]
    fn test_scores_survive_reopen() {
        let mut store = ScoreStore::with_clock(MemoryStorage::new(), fixed_clock);
        store.record_position(2, 77);
        let backend = store.backend().clone();
        let reopened = ScoreStore::with_clock(backend, fixed_clock);
        assert_eq!(reopened.high_score(2), 77);
    }

    #[test]
    fn test_persisted_layout_is_camel_case() {
        let mut store = ScoreStore::with_clock(MemoryStorage::new(), fixed_clock);
        store.record_position(1, 9);
        let json = store.backend().get(SCORES_KEY).unwrap();
        assert_eq!(json, r#"{"1":{"highScore":9,"gamesPlayed":0}}"#);
    }

    #[test]
    fn test_malformed_data_loads_as_empty() {
        let backend = MemoryStorage::new()
            .with_entry(SCORES_KEY, "{not json")
            .with_entry(HISTORY_KEY, "42");
        let store = ScoreStore::with_clock(backend, fixed_clock);
        assert_eq!(store.high_score(0), 0);
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = ScoreStore::with_clock(MemoryStorage::read_only(), fixed_clock);
        assert!(store.record_position(0, 50));
        assert_eq!(store.high_score(0), 50);
        store.record_game_result(&player(0, 100), &[player(0, 100), player(1, 3)]);
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_read_failure_starts_empty_and_keeps_playing() {
        let mut store = ScoreStore::with_clock(MemoryStorage::unreadable(), fixed_clock);
        assert_eq!(store.high_score(0), 0);
        assert!(store.history().is_empty());

        assert!(store.record_position(0, 30));
        assert_eq!(store.high_score(0), 30);
        store.record_game_result(&player(0, 100), &[player(0, 100), player(1, 3)]);
        assert_eq!(store.games_played(0), 1);
        // Written, but still unreadable.
        assert!(store.backend().get(HISTORY_KEY).is_some());
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_game_result_counts_for_winner() {
        let mut store = ScoreStore::with_clock(MemoryStorage::new(), fixed_clock);
        store.record_position(0, 100);
        let players = [player(0, 100), player(1, 33)];
        store.record_game_result(&players[0], &players);
        assert_eq!(store.games_played(0), 1);
        assert_eq!(store.games_played(1), 0);
        let history = store.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, fixed_clock());
        assert_eq!(history[0].winner.id, 0);
        assert_eq!(history[0].players[1].final_position, 33);
    }
}
