//! Browser front-end: canvas, keyboard, animation-frame loop.
//!
//! Stands in for the display-timing hardware. Each animation frame runs one
//! game tick, then scans every visible coordinate through the compositor
//! into an RGBA buffer and blits it with `putImageData`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, KeyboardEvent, window};

use crate::game::judge::Buttons;
use crate::game::round::RoundPhase;
use crate::game::{Game, LANES, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::render;

const CANVAS_ID: &str = "lr-canvas";
const STATUS_ID: &str = "lr-status";

/// Keyboard keys bound to lanes 0..3.
const LANE_KEYS: [&str; LANES] = ["d", "f", "j", "k"];

struct WebState {
    ctx: CanvasRenderingContext2d,
    game: Game,
    // Live key state; sampled once at the start of each tick.
    held: Buttons,
    frame: Vec<u8>,
    last_phase: RoundPhase,
}

thread_local! {
    static WEB_STATE: RefCell<Option<WebState>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn lane_for_key(key: &str) -> Option<usize> {
    LANE_KEYS.iter().position(|k| key.eq_ignore_ascii_case(k))
}

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_width(SCREEN_WIDTH as u32);
        c.set_height(SCREEN_HEIGHT as u32);
        c.set_attribute("style", "display:block; margin:24px auto; image-rendering:pixelated; border:2px solid #222;")?;
        body.append_child(&c)?;
        c
    };
    if doc.get_element_by_id(STATUS_ID).is_none() {
        let s = doc.create_element("div")?;
        s.set_id(STATUS_ID);
        s.set_attribute("style", "font:14px monospace; color:#ccc; text-align:center;")?;
        body.append_child(&s)?;
    }

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let state = WebState {
        ctx,
        game: Game::new(),
        held: Buttons::default(),
        frame: vec![0; render::frame_len()],
        last_phase: RoundPhase::Active,
    };
    WEB_STATE.with(|s| s.replace(Some(state)));
    log("lane-rush: round started");

    // Lane keys down; Enter restarts the round.
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            WEB_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    let key = evt.key();
                    if key == "Enter" {
                        st.game.reset();
                        st.last_phase = RoundPhase::Active;
                        log("lane-rush: round reset");
                    } else if let Some(lane) = lane_for_key(&key) {
                        st.held.set(lane, true);
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            WEB_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    if let Some(lane) = lane_for_key(&evt.key()) {
                        st.held.set(lane, false);
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_loop();
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        WEB_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow_mut().as_mut() {
                if let Err(e) = frame(state) {
                    web_sys::console::error_1(&e);
                }
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(closure)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

fn frame(state: &mut WebState) -> Result<(), JsValue> {
    // Phase 1: commit the tick.
    state.game.on_frame_tick(state.held);
    let phase = state.game.round().phase;
    if phase != state.last_phase {
        let status = state.game.status();
        log(&format!(
            "lane-rush: round {:?} (score {}, frame {}, max combo {})",
            phase, status.score, status.frame_counter, status.max_combo
        ));
        state.last_phase = phase;
    }

    // Phase 2: read-only raster scan.
    render::rasterize_rgba(&state.game, &mut state.frame);
    let img = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(&state.frame[..]),
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
    )?;
    state.ctx.put_image_data(&img, 0.0, 0.0)?;

    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(STATUS_ID))
    {
        let s = state.game.status();
        el.set_text_content(Some(&format!(
            "score {:3}  combo {:3}  {:?}  buttons {:04b}  frame {}",
            s.score, s.combo, s.last_judgment, s.buttons, s.frame_counter
        )));
    }
    Ok(())
}

pub fn reset() {
    WEB_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            st.game.reset();
            st.last_phase = RoundPhase::Active;
            log("lane-rush: round reset");
        }
    });
}

#[cfg(feature = "serde_json")]
pub fn status_json() -> Result<String, JsValue> {
    let status = WEB_STATE
        .with(|cell| cell.borrow().as_ref().map(|st| st.game.status()))
        .ok_or_else(|| JsValue::from_str("game not started"))?;
    serde_json::to_string(&status).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_keys() {
        assert_eq!(lane_for_key("d"), Some(0));
        assert_eq!(lane_for_key("F"), Some(1));
        assert_eq!(lane_for_key("k"), Some(3));
        assert_eq!(lane_for_key("Enter"), None);
    }
}
