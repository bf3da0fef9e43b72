//! Turns a resolved [`TurnOutcome`] into timed presentation cues.
//!
//! The engine has already committed the final positions; this module only
//! decides *when* the browser shows each step. Timings mirror the feel of the
//! tabletop game: a rattling die, a short "You rolled" alert, then the token
//! hopping one cell at a time.

use crate::board::{FINAL_CELL, HazardKind};
use crate::engine::{GameSession, PlayerId, TurnEvent, TurnOutcome, TurnState};

pub const DICE_ROLL_MS: f64 = 1500.0;
pub const DICE_ALERT_MS: f64 = 1000.0;
/// Delay between the die face appearing and the token starting to move.
pub const ALERT_TO_MOVE_MS: f64 = 1500.0;
pub const STEP_MS: f64 = 200.0;
/// Pause on a hazard's start cell before the jump.
pub const HAZARD_PAUSE_MS: f64 = 500.0;
/// Pause after a hazard jump before the turn ends.
pub const HAZARD_SETTLE_MS: f64 = 300.0;
pub const GAME_OVER_DELAY_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CueAction {
    DiceRolling,
    DiceShown(u8),
    HideDiceAlert,
    /// Draw `player`'s token on `cell`.
    MoveToken { player: PlayerId, cell: u8 },
    /// Landed on a hazard start: burst + sound at `cell`.
    HazardReveal { kind: HazardKind, cell: u8 },
    Celebrate,
    ShowWinner { player: PlayerId },
    ShowGameOver,
    /// Playback finished; `player` may roll.
    NextTurn { player: PlayerId },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cue {
    /// Milliseconds after the roll was triggered.
    pub at_ms: f64,
    pub action: CueAction,
}

fn cue(at_ms: f64, action: CueAction) -> Cue {
    Cue { at_ms, action }
}

/// Schedule for replaying `outcome`, ordered by time.
pub fn build(outcome: &TurnOutcome) -> Vec<Cue> {
    let player = outcome.player;
    let mut cues = vec![
        cue(0.0, CueAction::DiceRolling),
        cue(DICE_ROLL_MS, CueAction::DiceShown(outcome.dice)),
        cue(DICE_ROLL_MS + DICE_ALERT_MS, CueAction::HideDiceAlert),
    ];

    let move_start = DICE_ROLL_MS + ALERT_TO_MOVE_MS;
    let steps = outcome.target - outcome.from;
    for k in 1..=steps {
        cues.push(cue(
            move_start + f64::from(k) * STEP_MS,
            CueAction::MoveToken {
                player,
                cell: outcome.from + k,
            },
        ));
    }
    let mut t = move_start + f64::from(steps) * STEP_MS;

    let hazard = outcome.events.iter().find_map(|e| match *e {
        TurnEvent::SnakeBite { from, to, .. } => Some((HazardKind::Snake, from, to)),
        TurnEvent::LadderClimb { from, to, .. } => Some((HazardKind::Ladder, from, to)),
        _ => None,
    });
    if let Some((kind, from, to)) = hazard {
        cues.push(cue(t, CueAction::HazardReveal { kind, cell: from }));
        t += HAZARD_PAUSE_MS;
        cues.push(cue(t, CueAction::MoveToken { player, cell: to }));
        t += HAZARD_SETTLE_MS;
    }

    match outcome.state {
        TurnState::GameOver { winner } => {
            debug_assert_eq!(outcome.final_position(), FINAL_CELL);
            cues.push(cue(t, CueAction::Celebrate));
            cues.push(cue(t, CueAction::ShowWinner { player: winner }));
            cues.push(cue(t + GAME_OVER_DELAY_MS, CueAction::ShowGameOver));
        }
        TurnState::AwaitingRoll { player: next } => {
            cues.push(cue(t, CueAction::NextTurn { player: next }));
        }
    }
    cues
}

/// Cursor over a cue list anchored at the time the roll started.
#[derive(Debug, Clone)]
pub struct Playback {
    start_ms: f64,
    cues: Vec<Cue>,
    next: usize,
}

impl Playback {
    pub fn new(start_ms: f64, cues: Vec<Cue>) -> Self {
        Self {
            start_ms,
            cues,
            next: 0,
        }
    }

    /// Cues that became due since the last call, in order.
    pub fn due(&mut self, now_ms: f64) -> Vec<CueAction> {
        let elapsed = now_ms - self.start_ms;
        let mut out = Vec::new();
        while let Some(c) = self.cues.get(self.next) {
            if c.at_ms > elapsed {
                break;
            }
            out.push(c.action);
            self.next += 1;
        }
        out
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.cues.len()
    }
}

/// What the page currently shows for each player. The engine commits a whole
/// turn at once; this only advances as cues are replayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shown {
    /// Cell each token is drawn on.
    pub cells: Vec<u8>,
    /// Best cell reached on screen, starting from the stored high score.
    pub best: Vec<u8>,
    /// Player highlighted as next to roll; `None` once someone has won.
    pub active: Option<PlayerId>,
}

impl Shown {
    pub fn new(session: &GameSession) -> Self {
        Self {
            cells: session.players.iter().map(|p| p.position).collect(),
            best: session.players.iter().map(|p| p.high_score).collect(),
            active: (!session.is_finished()).then(|| session.current_player().id),
        }
    }

    pub fn apply(&mut self, action: &CueAction) {
        match *action {
            CueAction::MoveToken { player, cell } => {
                let i = usize::from(player);
                if let (Some(shown), Some(best)) = (self.cells.get_mut(i), self.best.get_mut(i)) {
                    *shown = cell;
                    *best = (*best).max(cell);
                }
            }
            CueAction::NextTurn { player } => self.active = Some(player),
            CueAction::ShowWinner { .. } => self.active = None,
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
