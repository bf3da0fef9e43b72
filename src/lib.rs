//! Snakes & Ladders core crate.
//!
//! The game logic (board geometry, hazard table, turn engine, score store and
//! session controller) is plain Rust and runs natively under `cargo test`. The
//! browser front end (`app`, `render`, `audio`) drives it from WASM: a roll is
//! resolved synchronously by the engine, then replayed on the canvas from the
//! engine's ordered event list.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod effects;
pub mod engine;
pub mod error;
pub mod game;
pub mod rng;
pub mod store;
pub mod timeline;

mod app;
mod audio;
mod logging;
mod render;

pub use app::{reset_game, roll_dice, start_app, start_game};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Game-wide constants
// -----------------------------------------------------------------------------

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Token color per player id.
pub const PLAYER_COLORS: [&str; MAX_PLAYERS] = [
    "#FF4444", "#4444FF", "#44FF44", "#FFFF44", "#FF8844", "#790ECB",
];
