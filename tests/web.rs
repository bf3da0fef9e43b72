//! Browser tests for the `localStorage` backend.
//!
//! Run with: wasm-pack test --headless --firefox
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use snakes_ladders::engine::Player;
use snakes_ladders::store::{HISTORY_KEY, LocalStorage, SCORES_KEY, ScoreStore, StorageBackend};

wasm_bindgen_test_configure!(run_in_browser);

fn clear() {
    let storage = web_sys::window()
        .unwrap()
        .local_storage()
        .unwrap()
        .unwrap();
    storage.remove_item(SCORES_KEY).unwrap();
    storage.remove_item(HISTORY_KEY).unwrap();
}

#[wasm_bindgen_test]
fn scores_survive_reopening() {
    clear();
    let mut scores = ScoreStore::open(LocalStorage::open().unwrap());
    assert!(scores.record_position(2, 41));
    assert!(!scores.record_position(2, 30));

    let reopened = ScoreStore::open(LocalStorage::open().unwrap());
    assert_eq!(reopened.high_score(2), 41);
    clear();
}

#[wasm_bindgen_test]
fn history_is_written_as_camel_case_json() {
    clear();
    let mut scores = ScoreStore::open(LocalStorage::open().unwrap());
    let winner = Player {
        id: 0,
        color: "#FF4444",
        position: 100,
        high_score: 100,
    };
    scores.record_game_result(&winner, std::slice::from_ref(&winner));

    let raw = LocalStorage::open().unwrap().read(HISTORY_KEY).unwrap().unwrap();
    assert!(raw.contains("\"finalPosition\":100"));
    assert_eq!(scores.history().len(), 1);
    clear();
}

#[wasm_bindgen_test]
fn reset_mid_roll_clears_dice_alert_and_spin() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let body = doc.body().unwrap();
    for (id, class) in [("diceAlert", "show"), ("dice3D", "dice-3d rolling")] {
        let el = doc.create_element("div").unwrap();
        el.set_id(id);
        el.set_class_name(class);
        body.append_child(&el).unwrap();
    }

    snakes_ladders::start_app().unwrap();
    snakes_ladders::reset_game();

    let alert = doc.get_element_by_id("diceAlert").unwrap();
    assert!(!alert.class_list().contains("show"));
    let dice = doc.get_element_by_id("dice3D").unwrap();
    assert_eq!(dice.class_name(), "dice-3d");
}
