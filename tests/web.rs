// Browser tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use bug_catcher::game::{STATS_STORAGE_KEY, SessionStats, stats};
use bug_catcher::storage::StatsStore;
use bug_catcher::web::LocalStorage;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trips_stats() {
    let mut store = LocalStorage::open().unwrap();
    let snapshot = SessionStats {
        games_played: 2,
        highest_score: 17,
        ..SessionStats::default()
    };
    stats::save_stats(&mut store, &snapshot).unwrap();
    assert!(store.read(STATS_STORAGE_KEY).unwrap().is_some());
    assert_eq!(stats::load_stats(&store), snapshot);
}

#[wasm_bindgen_test]
fn start_game_needs_a_game_area() {
    assert!(bug_catcher::start_game().is_err());
}
