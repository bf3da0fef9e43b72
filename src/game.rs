//! Session lifecycle: start, roll, reset.
//!
//! [`GameController`] owns the single live [`GameSession`] and the score store
//! and is the only caller of [`resolve_turn`]. Contract violations the engine
//! merely asserts on (rolling with no game, rolling after a win) are reported
//! here as [`GameError`]s.

use crate::board::{self, HazardTable};
use crate::engine::{DiceSource, GameSession, Phase, Player, PlayerId, TurnOutcome, resolve_turn};
use crate::error::GameError;
use crate::store::{ScoreStore, StorageBackend};
use crate::{MAX_PLAYERS, MIN_PLAYERS, PLAYER_COLORS};

pub struct GameController<B> {
    hazards: &'static HazardTable,
    store: ScoreStore<B>,
    session: Option<GameSession>,
}

impl<B: StorageBackend> GameController<B> {
    /// Controller over the classic board.
    pub fn new(store: ScoreStore<B>) -> Self {
        Self::with_board(store, board::classic())
    }

    pub fn with_board(store: ScoreStore<B>, hazards: &'static HazardTable) -> Self {
        Self {
            hazards,
            store,
            session: None,
        }
    }

    pub fn hazards(&self) -> &'static HazardTable {
        self.hazards
    }

    pub fn store(&self) -> &ScoreStore<B> {
        &self.store
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::NotStarted, |s| s.phase)
    }

    /// Start a game for `player_count` players. An invalid count leaves any
    /// existing session untouched.
    pub fn start(&mut self, player_count: usize) -> Result<&GameSession, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            log::warn!("rejected player count {player_count}");
            return Err(GameError::InvalidPlayerCount(player_count));
        }
        let players = (0..player_count)
            .map(|i| {
                let id = i as PlayerId;
                Player::new(id, PLAYER_COLORS[i], self.store.high_score(id))
            })
            .collect();
        log::info!("starting game with {player_count} players");
        Ok(&*self.session.insert(GameSession::new(players)))
    }

    /// Roll for the current player and resolve the turn.
    pub fn roll(&mut self, dice: &mut impl DiceSource) -> Result<TurnOutcome, GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;
        if session.is_finished() {
            return Err(GameError::GameFinished);
        }
        let value = dice.roll();
        Ok(resolve_turn(session, self.hazards, value, &mut self.store))
    }

    /// Drop the session and return to the pre-game state.
    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            log::info!("game reset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    struct Fixed(u8);

    impl DiceSource for Fixed {
        fn roll(&mut self) -> u8 {
            self.0
        }
    }

    fn controller() -> GameController<MemoryStorage> {
        GameController::new(ScoreStore::with_clock(MemoryStorage::new(), || 0))
    }

    #[test]
    fn test_invalid_count_leaves_state_alone() {
        let mut c = controller();
        assert_eq!(c.start(1).unwrap_err(), GameError::InvalidPlayerCount(1));
        assert_eq!(c.start(7).unwrap_err(), GameError::InvalidPlayerCount(7));
        assert_eq!(c.phase(), Phase::NotStarted);

        c.start(3).unwrap();
        c.roll(&mut Fixed(2)).unwrap();
        assert!(c.start(0).is_err());
        assert_eq!(c.session().unwrap().players[0].position, 2);
    }

    #[test]
    fn test_roll_without_game_is_rejected() {
        let mut c = controller();
        assert_eq!(c.roll(&mut Fixed(1)).unwrap_err(), GameError::NoActiveGame);
    }

    #[test]
    fn test_players_get_palette_colors() {
        let mut c = controller();
        let s = c.start(6).unwrap();
        let colors: Vec<_> = s.players.iter().map(|p| p.color).collect();
        assert_eq!(colors, PLAYER_COLORS.to_vec());
        assert!(s.players.iter().all(|p| p.position == 0));
    }

    #[test]
    fn test_reset_discards_session() {
        let mut c = controller();
        c.start(2).unwrap();
        c.reset();
        assert!(c.session().is_none());
        assert_eq!(c.phase(), Phase::NotStarted);
    }
}
