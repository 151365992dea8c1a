// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use lane_rush::render::{self, BACKGROUND};
use lane_rush::{Buttons, Game};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_creates_canvas() {
    lane_rush::start_game().expect("start_game");
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("lr-canvas").is_some());
    assert!(doc.get_element_by_id("lr-status").is_some());
    lane_rush::reset_game();
}

#[wasm_bindgen_test]
fn rasterized_frame_has_opaque_background() {
    let mut game = Game::new();
    game.on_frame_tick(Buttons::default());
    let mut buf = vec![0u8; render::frame_len()];
    render::rasterize_rgba(&game, &mut buf);
    let i = (240 * 640 + 80) * 4;
    assert_eq!(&buf[i..i + 4], &[BACKGROUND.r, BACKGROUND.g, BACKGROUND.b, 255]);
}
