//! Turn engine: resolves one dice roll into committed positions and events.
//!
//! The transition is synchronous and atomic with respect to game logic.
//! Presentation code replays the returned [`TurnEvent`] list with whatever
//! timing it likes; it never decides outcomes.
//!
//! ```text
//! AwaitingRoll(p) --roll--> Resolving(p, target) --+--> AwaitingRoll(next)
//!                                                  +--> GameOver(p)
//! ```
//!
//! `Resolving` only exists inside [`resolve_turn`].

use crate::board::{FINAL_CELL, HazardKind, HazardTable};
use crate::rng::DIE_FACES;

pub type PlayerId = u8;

/// One participant. `position` 0 means not yet on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub color: &'static str,
    pub position: u8,
    /// Farthest cell ever reached by this identity (seeded from the store).
    pub high_score: u8,
}

impl Player {
    pub fn new(id: PlayerId, color: &'static str, high_score: u8) -> Self {
        Self {
            id,
            color,
            position: 0,
            high_score,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished { winner: PlayerId },
}

/// Whose move it is, as seen from outside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    AwaitingRoll { player: PlayerId },
    GameOver { winner: PlayerId },
}

/// The live game: players in turn order plus the index of the player to move.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub players: Vec<Player>,
    pub current: usize,
    pub phase: Phase,
}

impl GameSession {
    /// A fresh in-progress session with player 0 to move.
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            current: 0,
            phase: Phase::InProgress,
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn turn_state(&self) -> TurnState {
        match self.phase {
            Phase::Finished { winner } => TurnState::GameOver { winner },
            _ => TurnState::AwaitingRoll {
                player: self.current_player().id,
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    pub fn winner(&self) -> Option<&Player> {
        match self.phase {
            Phase::Finished { winner } => self.players.iter().find(|p| p.id == winner),
            _ => None,
        }
    }
}

/// A single observable step of a resolved roll, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    PlainMove { player: PlayerId, to: u8 },
    SnakeBite { player: PlayerId, from: u8, to: u8 },
    LadderClimb { player: PlayerId, from: u8, to: u8 },
    Win { player: PlayerId },
}

/// Everything presentation needs to replay one roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player: PlayerId,
    pub dice: u8,
    /// Position before the roll.
    pub from: u8,
    /// `min(from + dice, 100)`, before any hazard.
    pub target: u8,
    pub events: Vec<TurnEvent>,
    pub state: TurnState,
    /// True if any committed position in this roll raised the stored high score.
    pub new_high_score: bool,
}

impl TurnOutcome {
    /// Committed position once the roll has fully resolved.
    pub fn final_position(&self) -> u8 {
        self.events
            .iter()
            .rev()
            .find_map(|e| match *e {
                TurnEvent::PlainMove { to, .. }
                | TurnEvent::SnakeBite { to, .. }
                | TurnEvent::LadderClimb { to, .. } => Some(to),
                TurnEvent::Win { .. } => None,
            })
            .unwrap_or(self.target)
    }

    pub fn is_win(&self) -> bool {
        matches!(self.state, TurnState::GameOver { .. })
    }
}

/// Source of die faces in `1..=6`.
pub trait DiceSource {
    fn roll(&mut self) -> u8;
}

/// The engine's view of the score/history store.
pub trait ScoreSink {
    /// Record that `player` occupied `position`; returns true on a new high score.
    fn record_position(&mut self, player: PlayerId, position: u8) -> bool;
    /// Record a finished game.
    fn record_game_result(&mut self, winner: &Player, players: &[Player]);
}

fn commit(player: &mut Player, cell: u8, scores: &mut impl ScoreSink) -> bool {
    player.position = cell;
    player.high_score = player.high_score.max(cell);
    scores.record_position(player.id, cell)
}

/// Resolve one roll of `dice` for the session's current player.
///
/// Callers guarantee `dice` is in `1..=6`, the session is in progress and the
/// current player has not already won. These are contract checks, not runtime
/// errors: only the controller invokes the engine.
pub fn resolve_turn(
    session: &mut GameSession,
    hazards: &HazardTable,
    dice: u8,
    scores: &mut impl ScoreSink,
) -> TurnOutcome {
    debug_assert!((1..=DIE_FACES).contains(&dice), "die value {dice}");
    debug_assert_eq!(session.phase, Phase::InProgress);

    let idx = session.current;
    let player = &mut session.players[idx];
    debug_assert!(player.position < FINAL_CELL);

    let id = player.id;
    let from = player.position;
    let target = (from + dice).min(FINAL_CELL);
    let mut events = Vec::with_capacity(2);

    // Commit the landing cell before looking for hazards so the intermediate
    // cell counts towards the high score.
    let mut new_high_score = commit(player, target, scores);

    if target != FINAL_CELL {
        match hazards.lookup(target) {
            Some(h) => {
                events.push(match h.kind {
                    HazardKind::Snake => TurnEvent::SnakeBite {
                        player: id,
                        from: target,
                        to: h.end,
                    },
                    HazardKind::Ladder => TurnEvent::LadderClimb {
                        player: id,
                        from: target,
                        to: h.end,
                    },
                });
                new_high_score |= commit(player, h.end, scores);
                log::debug!("player {id}: {:?} {} -> {}", h.kind, h.start, h.end);
            }
            None => events.push(TurnEvent::PlainMove {
                player: id,
                to: target,
            }),
        }
    }

    let landed = player.position;
    let state = if landed == FINAL_CELL {
        events.push(TurnEvent::Win { player: id });
        session.phase = Phase::Finished { winner: id };
        scores.record_game_result(&session.players[idx], &session.players);
        log::info!("player {} wins", id + 1);
        TurnState::GameOver { winner: id }
    } else {
        session.current = (idx + 1) % session.players.len();
        TurnState::AwaitingRoll {
            player: session.players[session.current].id,
        }
    };

    TurnOutcome {
        player: id,
        dice,
        from,
        target,
        events,
        state,
        new_high_score,
    }
}
