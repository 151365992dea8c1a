//! Lane Rush core crate.
//!
//! Four-lane falling-note rhythm game driven one frame tick at a time. The
//! `game` module holds the tick-synchronous state machine (round timer, note
//! pool, judgment, scoring, lane spawner); `render` maps a committed state and
//! a screen coordinate to a color. The `web` module is the browser host that
//! supplies frame ticks, keyboard buttons and the raster scan.

use wasm_bindgen::prelude::*;

pub mod game;
pub mod render;
mod web;

pub use game::judge::Buttons;
pub use game::round::RoundPhase;
pub use game::score::Judgment;
pub use game::{Game, Status, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use render::Rgb;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Browser entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start()
}

/// Restart the round from the power-on state.
#[wasm_bindgen]
pub fn reset_game() {
    web::reset()
}

/// Current status readout as JSON.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn status_json() -> Result<String, JsValue> {
    web::status_json()
}
