//! Bug Catcher core crate.
//!
//! Emoji bugs drift across the page and the cursor-driven net catches them on
//! hover. Gameplay lives in [`game`] and runs without a browser; [`web`] is
//! the thin DOM host exposed to JavaScript through `start_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
pub mod storage;
pub mod web;

pub use config::GameConfig;
pub use error::{GameError, Result};
pub use game::Session;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_console_logging();
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Start a session with default tuning. Needs a `#gameArea` element.
#[wasm_bindgen]
pub fn start_game() -> std::result::Result<(), JsValue> {
    web::start(GameConfig::default())
}

/// Start a session with tuning overrides given as camelCase JSON.
#[wasm_bindgen]
pub fn start_game_with_config(config_json: &str) -> std::result::Result<(), JsValue> {
    let config = GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start(config)
}

/// Lifetime statistics as the JSON document kept in storage.
#[wasm_bindgen]
pub fn current_stats() -> String {
    web::current_stats()
}
