//! Browser front end: DOM screens, input wiring and the animation loop.
//!
//! State lives in a thread-local [`AppState`]; every event handler and the
//! `requestAnimationFrame` callback borrows it briefly. A roll resolves the
//! turn immediately through [`GameController`] and then replays the outcome as
//! a [`Playback`] of timed cues while the roll button stays disabled.
//!
//! Expected host elements (all optional except where created here):
//! `startScreen`, `playerCount`, `startButton`, `gameScreen`, `rollDiceButton`,
//! `diceResult`, `dice3D`, `diceAlert`, `diceAlertText`, `currentPlayer`,
//! `scoreboard`, `gameOverScreen`, `winner`, `restartButton`. The board canvas
//! (`gameCanvas`) and the confetti layer (`confettiCanvas`) are created when
//! missing.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlButtonElement, HtmlCanvasElement,
    HtmlInputElement, HtmlSelectElement, KeyboardEvent, window,
};

use crate::audio::SoundEffects;
use crate::board::HazardKind;
use crate::effects::{Confetti, EmojiBurst};
use crate::engine::{Phase, PlayerId};
use crate::error::GameError;
use crate::game::GameController;
use crate::render::{self, TokenView};
use crate::rng::Entropy;
use crate::store::{LocalStorage, MemoryStorage, ScoreStore, StorageBackend};
use crate::timeline::{self, CueAction, Playback, Shown};

const BOARD_CANVAS_ID: &str = "gameCanvas";
const CONFETTI_CANVAS_ID: &str = "confettiCanvas";
const ICON_STYLE: &str = "font-weight: bold; font-size: 2em;";

struct AppState {
    doc: Document,
    board_canvas: HtmlCanvasElement,
    board_ctx: CanvasRenderingContext2d,
    board_size: f64,
    confetti_canvas: HtmlCanvasElement,
    confetti_ctx: CanvasRenderingContext2d,
    game: GameController<Box<dyn StorageBackend>>,
    dice: Entropy,
    sound: SoundEffects,
    /// Tokens, high scores and highlight as drawn; trails the committed
    /// session while a playback runs.
    shown: Shown,
    playback: Option<Playback>,
    bursts: Vec<EmojiBurst>,
    confetti: Option<Confetti>,
}

thread_local! {
    static APP: RefCell<Option<AppState>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut AppState) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn frame_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Build the app, hook up the page and start the frame loop. Safe to call once.
#[wasm_bindgen]
pub fn start_app() -> Result<(), JsValue> {
    if APP.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let board_canvas = ensure_canvas(
        &doc,
        BOARD_CANVAS_ID,
        "display:block; margin:0 auto; border-radius:12px; background:#181818;",
    )?;
    let board_ctx = context_2d(&board_canvas)?;
    let confetti_canvas = ensure_canvas(
        &doc,
        CONFETTI_CANVAS_ID,
        "position:fixed; left:0; top:0; width:100%; height:100%; pointer-events:none; z-index:60;",
    )?;
    let confetti_ctx = context_2d(&confetti_canvas)?;

    let backend: Box<dyn StorageBackend> = match LocalStorage::open() {
        Ok(ls) => Box::new(ls),
        Err(err) => {
            log::error!("Error loading scores from localStorage: {err}");
            Box::new(MemoryStorage::new())
        }
    };

    let mut state = AppState {
        doc: doc.clone(),
        board_canvas,
        board_ctx,
        board_size: 600.0,
        confetti_canvas,
        confetti_ctx,
        game: GameController::new(ScoreStore::open(backend)),
        dice: Entropy::new(),
        sound: SoundEffects::new(),
        shown: Shown::default(),
        playback: None,
        bursts: Vec::new(),
        confetti: None,
    };
    resize_board(&mut state);
    APP.with(|cell| cell.replace(Some(state)));

    on_click(&doc, "startButton", |_| {
        let count = read_player_count();
        if let Err(err) = start_game(count) {
            log::debug!("start rejected: {err:?}");
        }
    })?;
    on_click(&doc, "rollDiceButton", |_| roll_dice())?;
    on_click(&doc, "restartButton", |_| reset_game())?;

    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let key = evt.key();
            if key == " " || key == "Enter" {
                let playing = with_app(|s| s.game.phase() == Phase::InProgress).unwrap_or(false);
                if playing {
                    evt.prevent_default();
                    roll_dice();
                }
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_app(resize_board);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    log::info!("app ready");
    Ok(())
}

/// Start a game. Invalid counts are reported to the player and leave the
/// current screen untouched.
#[wasm_bindgen]
pub fn start_game(player_count: u32) -> Result<(), JsValue> {
    let result = with_app(|state| begin_game(state, player_count as usize))
        .ok_or_else(|| JsValue::from_str("app not started"))?;
    result.map_err(|err| {
        if let Some(win) = window() {
            win.alert_with_message(&err.to_string()).ok();
        }
        JsValue::from_str(&err.to_string())
    })
}

/// Roll for the current player. Ignored while a roll is still playing out or
/// when no game is in progress.
#[wasm_bindgen]
pub fn roll_dice() {
    with_app(|state| {
        if state.playback.is_some() || state.game.phase() != Phase::InProgress {
            return;
        }
        match state.game.roll(&mut state.dice) {
            Ok(outcome) => {
                log::debug!("roll outcome: {outcome:?}");
                set_roll_enabled(&state.doc, false);
                state.playback = Some(Playback::new(frame_now(), timeline::build(&outcome)));
            }
            Err(err) => log::warn!("roll rejected: {err}"),
        }
    });
}

/// Discard the session and go back to the start screen.
#[wasm_bindgen]
pub fn reset_game() {
    with_app(|state| {
        state.game.reset();
        state.playback = None;
        state.shown.clear();
        state.bursts.clear();
        clear_confetti(state);
        toggle_class(&state.doc, "diceAlert", "show", false);
        set_class(&state.doc, "dice3D", "dice-3d");
        set_hidden(&state.doc, "gameOverScreen", true);
        set_hidden(&state.doc, "gameScreen", true);
        set_hidden(&state.doc, "startScreen", false);
        set_text(&state.doc, "diceResult", "");
        set_roll_enabled(&state.doc, true);
    });
}

fn begin_game(state: &mut AppState, player_count: usize) -> Result<(), GameError> {
    state.shown = Shown::new(state.game.start(player_count)?);
    state.playback = None;
    state.bursts.clear();
    clear_confetti(state);

    set_hidden(&state.doc, "startScreen", true);
    set_hidden(&state.doc, "gameOverScreen", true);
    set_hidden(&state.doc, "gameScreen", false);
    set_roll_enabled(&state.doc, true);
    resize_board(state);
    update_current_player(state);
    update_scoreboard(state);
    Ok(())
}

// --- Frame loop -------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|state| tick(state, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn tick(state: &mut AppState, now: f64) {
    if let Some(playback) = state.playback.as_mut() {
        let due = playback.due(now);
        let done = playback.is_done();
        for action in due {
            apply_cue(state, action, now);
        }
        if done {
            state.playback = None;
        }
    }

    state.bursts.retain(|b| !b.is_expired(now));
    if let Some(confetti) = state.confetti.as_mut() {
        confetti.step();
        let finished = confetti.is_finished();
        let (w, h) = (
            f64::from(state.confetti_canvas.width()),
            f64::from(state.confetti_canvas.height()),
        );
        if let Err(err) = render::draw_confetti(&state.confetti_ctx, w, h, confetti) {
            log::warn!("confetti draw failed: {err:?}");
        }
        if finished {
            clear_confetti(state);
        }
    }

    if state.game.session().is_some() {
        let tokens = token_views(state);
        if let Err(err) = render::draw_board(
            &state.board_ctx,
            state.board_size,
            state.game.hazards(),
            &tokens,
            &state.bursts,
            now,
        ) {
            log::warn!("board draw failed: {err:?}");
        }
    }
}

fn apply_cue(state: &mut AppState, action: CueAction, now: f64) {
    let doc = state.doc.clone();
    state.shown.apply(&action);
    match action {
        CueAction::DiceRolling => {
            state.sound.dice_roll();
            set_class(&doc, "dice3D", "dice-3d rolling");
            set_text(&doc, "diceResult", "🎲 Rolling...");
        }
        CueAction::DiceShown(value) => {
            set_class(&doc, "dice3D", &format!("dice-3d show-{value}"));
            set_text(&doc, "diceResult", &format!("🎲 {value}"));
            set_text(&doc, "diceAlertText", &format!("You rolled: {value}"));
            toggle_class(&doc, "diceAlert", "show", true);
        }
        CueAction::HideDiceAlert => toggle_class(&doc, "diceAlert", "show", false),
        CueAction::MoveToken { .. } => update_scoreboard(state),
        CueAction::HazardReveal { kind, cell } => {
            state.bursts.push(EmojiBurst::for_hazard(kind, cell, now));
            match kind {
                HazardKind::Snake => state.sound.buzzer(),
                HazardKind::Ladder => state.sound.firecracker(),
            }
        }
        CueAction::Celebrate => {
            if let Some(win) = window() {
                let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
                let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
                state.confetti_canvas.set_width(w as u32);
                state.confetti_canvas.set_height(h as u32);
                let dice = &mut state.dice;
                state.confetti = Some(Confetti::burst(w, h, &mut || dice.unit()));
            }
        }
        CueAction::ShowWinner { player } => {
            if let Some(el) = doc.get_element_by_id("winner") {
                el.set_inner_html(&format!(
                    "<span style=\"color: {}; font-weight: bold;\">Player {}</span> Wins! 🎉",
                    player_color(state, player),
                    player + 1
                ));
            }
            update_scoreboard(state);
        }
        CueAction::ShowGameOver => {
            set_hidden(&doc, "gameScreen", true);
            set_hidden(&doc, "gameOverScreen", false);
        }
        CueAction::NextTurn { .. } => {
            update_current_player(state);
            update_scoreboard(state);
            set_roll_enabled(&doc, true);
        }
    }
}

// --- View helpers -----------------------------------------------------------

fn token_views(state: &AppState) -> Vec<TokenView> {
    let Some(session) = state.game.session() else {
        return Vec::new();
    };
    session
        .players
        .iter()
        .zip(state.shown.cells.iter())
        .map(|(p, &cell)| TokenView {
            color: p.color,
            cell,
        })
        .collect()
}

fn player_color(state: &AppState, player: PlayerId) -> &'static str {
    state
        .game
        .session()
        .and_then(|s| s.players.get(usize::from(player)))
        .map_or("#ffffff", |p| p.color)
}

fn update_current_player(state: &AppState) {
    let Some(session) = state.game.session() else {
        return;
    };
    let Some(p) = state
        .shown
        .active
        .and_then(|id| session.players.get(usize::from(id)))
    else {
        return;
    };
    if let Some(el) = state.doc.get_element_by_id("currentPlayer") {
        el.set_inner_html(&format!(
            "Current Player: <span style=\"color: {}; font-weight: bold;\">Player {}</span>",
            p.color,
            p.id + 1
        ));
    }
}

fn update_scoreboard(state: &AppState) {
    let (Some(session), Some(board)) = (
        state.game.session(),
        state.doc.get_element_by_id("scoreboard"),
    ) else {
        return;
    };
    let mut html = String::new();
    for (i, p) in session.players.iter().enumerate() {
        let shown = state.shown.cells.get(i).copied().unwrap_or(p.position);
        let high = state.shown.best.get(i).copied().unwrap_or(p.high_score);
        let at_high = shown > 0 && shown == high;
        let mut class = String::from("player-score");
        if state.shown.active == Some(p.id) {
            class.push_str(" active");
        }
        if at_high {
            class.push_str(" at-high-score");
        }
        html.push_str(&format!(
            "<div class=\"{class}\">\
               <div class=\"player-icon\" style=\"{ICON_STYLE} color: {color};\">K</div>\
               <div class=\"player-info\">\
                 <div class=\"player-position\">Player {n} - Position: {shown}</div>\
                 <div class=\"player-high-score\" style=\"color: {hs_color}\">\
                   High Score: {high}</div>\
               </div>\
             </div>",
            color = p.color,
            n = p.id + 1,
            hs_color = if at_high { "#790ECB" } else { "#888" },
        ));
    }
    board.set_inner_html(&html);
}

fn resize_board(state: &mut AppState) {
    let Some(win) = window() else {
        return;
    };
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1200.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(760.0);
    let size = render::fit_canvas_size(w, h).floor();
    state.board_size = size;
    state.board_canvas.set_width(size as u32);
    state.board_canvas.set_height(size as u32);
}

fn clear_confetti(state: &mut AppState) {
    state.confetti = None;
    let (w, h) = (
        f64::from(state.confetti_canvas.width()),
        f64::from(state.confetti_canvas.height()),
    );
    state.confetti_ctx.clear_rect(0.0, 0.0, w, h);
}

// --- DOM plumbing -----------------------------------------------------------

fn ensure_canvas(doc: &Document, id: &str, style: &str) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return el.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from);
    }
    let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    c.set_id(id);
    c.set_attribute("style", style).ok();
    let parent: Element = match doc.get_element_by_id("gameScreen") {
        Some(screen) if id == BOARD_CANVAS_ID => screen,
        _ => doc
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .into(),
    };
    parent.append_child(&c)?;
    Ok(c)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(JsValue::from)
}

fn on_click(
    doc: &Document,
    id: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let Some(el) = doc.get_element_by_id(id) else {
        log::debug!("#{id} not present; skipping click handler");
        return Ok(());
    };
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn read_player_count() -> u32 {
    let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("playerCount"))
    else {
        return crate::MIN_PLAYERS as u32;
    };
    let raw = if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else {
        String::new()
    };
    // Unparseable input is rejected by start validation like any bad count.
    raw.trim().parse().unwrap_or(0)
}

fn set_hidden(doc: &Document, id: &str, hidden: bool) {
    toggle_class(doc, id, "hidden", hidden);
}

fn toggle_class(doc: &Document, id: &str, class: &str, on: bool) {
    if let Some(el) = doc.get_element_by_id(id) {
        let list = el.class_list();
        let res = if on {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
        res.ok();
    }
}

fn set_class(doc: &Document, id: &str, class: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_class_name(class);
    }
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_roll_enabled(doc: &Document, enabled: bool) {
    if let Some(btn) = doc
        .get_element_by_id("rollDiceButton")
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    {
        btn.set_disabled(!enabled);
    }
}
