// Native integration tests for whole turns: controller + engine + store.
// These avoid wasm/browser APIs so they run under `cargo test` on the host.

use snakes_ladders::board::{Hazard, HazardTable, classic};
use snakes_ladders::engine::{
    DiceSource, GameSession, Phase, Player, TurnEvent, TurnState, resolve_turn,
};
use snakes_ladders::error::GameError;
use snakes_ladders::game::GameController;
use snakes_ladders::store::{HISTORY_KEY, HISTORY_LIMIT, MemoryStorage, ScoreStore};

/// Plays back a fixed list of die faces, cycling when exhausted.
struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    fn new(faces: &[u8]) -> Self {
        Self {
            faces: faces.to_vec(),
            next: 0,
        }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}

fn clock() -> u64 {
    1_000
}

fn store() -> ScoreStore<MemoryStorage> {
    ScoreStore::with_clock(MemoryStorage::new(), clock)
}

fn session(positions: &[u8]) -> GameSession {
    GameSession::new(
        positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let mut p = Player::new(i as u8, snakes_ladders::PLAYER_COLORS[i], pos);
                p.position = pos;
                p
            })
            .collect(),
    )
}

#[test]
fn roll_from_95_clamps_and_wins() {
    let mut s = session(&[95, 10]);
    let mut scores = store();
    let out = resolve_turn(&mut s, classic(), 6, &mut scores);
    assert_eq!(out.events, vec![TurnEvent::Win { player: 0 }]);
    assert_eq!(s.players[0].position, 100);
    assert_eq!(scores.high_score(0), 100);
    assert_eq!(s.turn_state(), TurnState::GameOver { winner: 0 });
}

#[test]
fn ladder_from_1_records_4_then_56() {
    let mut s = session(&[1, 0]);
    let mut scores = store();
    let out = resolve_turn(&mut s, classic(), 3, &mut scores);
    assert_eq!(out.target, 4);
    assert_eq!(out.final_position(), 56);
    assert_eq!(
        out.events,
        vec![TurnEvent::LadderClimb {
            player: 0,
            from: 4,
            to: 56
        }]
    );
    assert_eq!(scores.high_score(0), 56);
    assert!(out.new_high_score);
}

#[test]
fn snake_from_92_bites_to_28() {
    let mut s = session(&[92, 0]);
    let mut scores = store();
    let out = resolve_turn(&mut s, classic(), 6, &mut scores);
    assert_eq!(
        out.events,
        vec![TurnEvent::SnakeBite {
            player: 0,
            from: 98,
            to: 28
        }]
    );
    assert_eq!(s.players[0].position, 28);
    // 98 was reached mid-roll and stays the high score.
    assert_eq!(scores.high_score(0), 98);
}

#[test]
fn landing_on_100_ignores_hazards_even_if_configured_nearby() {
    let table = HazardTable::new(&[Hazard::snake(99, 1), Hazard::ladder(97, 99)]).unwrap();
    let mut s = session(&[96, 0]);
    let mut scores = store();
    let out = resolve_turn(&mut s, &table, 4, &mut scores);
    assert_eq!(out.events, vec![TurnEvent::Win { player: 0 }]);
}

#[test]
fn two_player_win_is_recorded_newest_first() {
    let mut c = GameController::new(store());
    c.start(2).unwrap();
    // Player 0 climbs 4->56 then 63->95, player 1 crawls one cell at a time.
    let mut dice = ScriptedDice::new(&[4, 1, 6, 1, 1, 1, 5, 1]);
    let mut last = None;
    while c.phase() == Phase::InProgress {
        last = Some(c.roll(&mut dice).unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.player, 0);
    assert_eq!(c.phase(), Phase::Finished { winner: 0 });

    let history = c.store().history();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.winner.id, 0);
    assert_eq!(entry.winner.final_position, 100);
    assert_eq!(entry.timestamp, clock());
    assert_eq!(entry.players.len(), 2);
    assert_eq!(entry.players[1].final_position, c.session().unwrap().players[1].position);
    assert_eq!(c.store().games_played(0), 1);
}

#[test]
fn finished_game_rejects_rolls() {
    let mut c = GameController::new(store());
    c.start(2).unwrap();
    // Multiples of five never touch a hazard on the classic board.
    let mut fives = ScriptedDice::new(&[5]);
    while c.phase() == Phase::InProgress {
        c.roll(&mut fives).unwrap();
    }
    assert_eq!(c.roll(&mut fives).unwrap_err(), GameError::GameFinished);
}

#[test]
fn history_keeps_ten_newest() {
    let mut scores = store();
    for game in 0..(HISTORY_LIMIT as u8 + 3) {
        let winner = Player {
            id: 0,
            color: "#FF4444",
            position: 100,
            high_score: 100,
        };
        let loser = Player {
            id: 1,
            color: "#4444FF",
            position: game,
            high_score: game,
        };
        scores.record_game_result(&winner, &[winner.clone(), loser]);
    }
    let history = scores.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    // Newest first: the last recorded game had the loser on cell 12.
    assert_eq!(history[0].players[1].final_position, HISTORY_LIMIT as u8 + 2);
    assert_eq!(history[HISTORY_LIMIT - 1].players[1].final_position, 3);
}

#[test]
fn high_scores_carry_into_the_next_game() {
    let mut c = GameController::new(store());
    c.start(2).unwrap();
    c.roll(&mut ScriptedDice::new(&[3])).unwrap();
    c.reset();
    let s = c.start(3).unwrap();
    assert_eq!(s.players[0].high_score, 3);
    assert_eq!(s.players[0].position, 0);
    assert_eq!(s.players[2].high_score, 0);
}

#[test]
fn legacy_history_without_colors_still_loads() {
    let legacy = r#"[{"timestamp":5,"winner":{"id":1,"emoji":"🐍","finalPosition":100},
        "players":[{"id":0,"emoji":"🦊","finalPosition":40},
                   {"id":1,"emoji":"🐍","finalPosition":100}]}]"#;
    let scores = ScoreStore::with_clock(
        MemoryStorage::new().with_entry(HISTORY_KEY, legacy),
        clock,
    );
    let history = scores.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].winner.id, 1);
    assert_eq!(history[0].winner.color, "");
}
