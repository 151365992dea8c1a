//! Per-pixel compositor.
//!
//! `pixel` is a pure function of a committed [`Game`] and one screen
//! coordinate. It is evaluated for every visible pixel each frame, so it
//! does no allocation and reads the state only through shared borrows.
//! Draw order while a round is active (later wins): background, lane bands,
//! hit window, notes, score bar, combo bar, hit flash, timer bar.

use crate::game::judge::{GOOD_RANGE, HIT_WINDOW_BOTTOM, HIT_WINDOW_MID, HIT_WINDOW_TOP, PERFECT_RANGE};
use crate::game::round::{RoundPhase, ROUND_TICKS};
use crate::game::score::{Judgment, SCORE_MAX};
use crate::game::{lane_left, Game, LANES, LANE_WIDTH, NOTE_HEIGHT, NOTE_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

// --- Palette -------------------------------------------------------------------

pub const BACKGROUND: Rgb = Rgb::new(12, 12, 20);
pub const LANE_BANDS: [Rgb; 2] = [Rgb::new(26, 26, 44), Rgb::new(32, 32, 54)];
pub const OK_BAND: Rgb = Rgb::new(40, 60, 110);
pub const GOOD_BAND: Rgb = Rgb::new(50, 120, 90);
pub const PERFECT_BAND: Rgb = Rgb::new(200, 170, 60);
pub const NOTE_COLORS: [Rgb; LANES] = [
    Rgb::new(230, 70, 70),
    Rgb::new(70, 140, 240),
    Rgb::new(80, 210, 110),
    Rgb::new(240, 200, 60),
];
pub const MISS_COLOR: Rgb = Rgb::new(200, 40, 40);
pub const OK_COLOR: Rgb = Rgb::new(80, 120, 230);
pub const GOOD_COLOR: Rgb = Rgb::new(60, 200, 100);
pub const PERFECT_COLOR: Rgb = Rgb::new(255, 210, 40);
pub const COMBO_COLORS: [Rgb; 3] = [Rgb::new(120, 120, 160), Rgb::new(60, 220, 230), Rgb::new(230, 60, 220)];
pub const TIMER_GREEN: Rgb = Rgb::new(40, 200, 60);
pub const TIMER_YELLOW: Rgb = Rgb::new(230, 210, 40);
pub const TIMER_RED: Rgb = Rgb::new(220, 40, 40);
pub const END_BACKGROUND: Rgb = Rgb::new(8, 8, 8);
pub const WON_COLOR: Rgb = Rgb::new(60, 230, 90);
pub const LOST_COLOR: Rgb = Rgb::new(230, 50, 50);

// --- Geometry ------------------------------------------------------------------

const NOTE_INSET: u16 = (LANE_WIDTH - NOTE_WIDTH) / 2;

const BAR_TOP: u16 = 64;
const BAR_BOTTOM: u16 = 472;
const BAR_HEIGHT: u16 = BAR_BOTTOM - BAR_TOP;

const SCORE_BAR_X: (u16, u16) = (592, 616);
const SCORE_MARKER_X: (u16, u16) = (588, 620);
const SCORE_MARKER_Y: (u16, u16) = (BAR_TOP - 2, BAR_TOP);

const COMBO_BAR_X: (u16, u16) = (24, 48);
const COMBO_PX: u16 = 4;

const TIMER_BAR_HEIGHT: u16 = 12;

const GLYPH_BOX: (i32, i32, i32, i32) = (200, 120, 440, 360);
const GLYPH_FRAME: i32 = 6;
const STROKE: i32 = 8;

fn within(v: u16, (lo, hi): (u16, u16)) -> bool {
    v >= lo && v < hi
}

/// Color of `(x, y)` for the committed game state. Coordinates outside the
/// visible area are blanked to black.
pub fn pixel(game: &Game, x: u16, y: u16) -> Rgb {
    if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
        return Rgb::BLACK;
    }
    let round = game.round();
    if !round.is_active() {
        return end_screen(round.phase, x, y);
    }

    let mut color = BACKGROUND;
    let lane = lane_at(x);

    if let Some(l) = lane {
        color = LANE_BANDS[l % 2];
        if within(y, (HIT_WINDOW_TOP, HIT_WINDOW_BOTTOM)) {
            color = window_band(y);
        }
        let left = lane_left(l) + NOTE_INSET;
        if within(x, (left, left + NOTE_WIDTH)) {
            // Pool order: later slots overdraw earlier ones, though notes in a
            // lane share one color so the overlap is not visible.
            for (_, note) in game.pool().active() {
                if note.lane as usize == l && y >= note.y && y < note.y + NOTE_HEIGHT {
                    color = NOTE_COLORS[l];
                }
            }
        }
    }

    let score = game.score();
    if within(x, SCORE_BAR_X) && y < BAR_BOTTOM {
        let fill = (score.score as u32 * BAR_HEIGHT as u32 / SCORE_MAX as u32) as u16;
        if y >= BAR_BOTTOM - fill {
            color = judgment_color(score.last_judgment);
        }
    }
    if within(x, SCORE_MARKER_X) && within(y, SCORE_MARKER_Y) {
        color = Rgb::WHITE;
    }

    if within(x, COMBO_BAR_X) && y < BAR_BOTTOM {
        let height = score.combo.saturating_mul(COMBO_PX).min(BAR_HEIGHT);
        if y >= BAR_BOTTOM - height {
            color = COMBO_COLORS[score.combo_tier() as usize];
        }
    }

    if let Some(l) = lane {
        let flash = game.flashes().lane(l);
        if flash.flashing && within(y, (HIT_WINDOW_TOP, HIT_WINDOW_BOTTOM)) {
            color = Rgb::grey(95 + flash.decay * 20);
        }
    }

    if y < TIMER_BAR_HEIGHT {
        let remaining = round.remaining() as u32;
        let width = SCREEN_WIDTH as u32 * remaining / ROUND_TICKS as u32;
        if (x as u32) < width {
            color = timer_color(remaining);
        }
    }

    color
}

/// Bytes in one RGBA frame of the visible area.
pub const fn frame_len() -> usize {
    SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize * 4
}

/// Scan every visible coordinate into a row-major RGBA buffer of `frame_len()` bytes.
pub fn rasterize_rgba(game: &Game, out: &mut [u8]) {
    let row = SCREEN_WIDTH as usize * 4;
    for (y, line) in out.chunks_exact_mut(row).take(SCREEN_HEIGHT as usize).enumerate() {
        for (x, px) in line.chunks_exact_mut(4).enumerate() {
            let c = pixel(game, x as u16, y as u16);
            px.copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
}

fn lane_at(x: u16) -> Option<usize> {
    let left = lane_left(0);
    let right = lane_left(LANES);
    within(x, (left, right)).then(|| ((x - left) / LANE_WIDTH) as usize)
}

fn window_band(y: u16) -> Rgb {
    let dist = y.abs_diff(HIT_WINDOW_MID);
    if dist <= PERFECT_RANGE {
        PERFECT_BAND
    } else if dist <= GOOD_RANGE {
        GOOD_BAND
    } else {
        OK_BAND
    }
}

pub fn judgment_color(j: Judgment) -> Rgb {
    match j {
        Judgment::Miss => MISS_COLOR,
        Judgment::Ok => OK_COLOR,
        Judgment::Good => GOOD_COLOR,
        Judgment::Perfect => PERFECT_COLOR,
    }
}

/// Green above two thirds of the round left, yellow down to one third, red below.
pub fn timer_color(remaining: u32) -> Rgb {
    let total = ROUND_TICKS as u32;
    if remaining * 3 > total * 2 {
        TIMER_GREEN
    } else if remaining * 3 >= total {
        TIMER_YELLOW
    } else {
        TIMER_RED
    }
}

// --- End screen ----------------------------------------------------------------

fn end_screen(phase: RoundPhase, x: u16, y: u16) -> Rgb {
    let (x, y) = (x as i32, y as i32);
    let (fg, drawn) = match phase {
        RoundPhase::Won => (WON_COLOR, check_mark(x, y)),
        RoundPhase::Lost => (LOST_COLOR, cross(x, y)),
        RoundPhase::Active => (END_BACKGROUND, false),
    };
    if drawn || glyph_frame(x, y) {
        fg
    } else {
        END_BACKGROUND
    }
}

fn glyph_frame(x: i32, y: i32) -> bool {
    let (x0, y0, x1, y1) = GLYPH_BOX;
    let outer = x >= x0 && x < x1 && y >= y0 && y < y1;
    let inner = x >= x0 + GLYPH_FRAME && x < x1 - GLYPH_FRAME && y >= y0 + GLYPH_FRAME && y < y1 - GLYPH_FRAME;
    outer && !inner
}

fn check_mark(x: i32, y: i32) -> bool {
    // Short stroke down-right from (240, 250), long stroke up-right from (300, 310).
    let short = (240..=300).contains(&x) && ((x - 240) - (y - 250)).abs() <= STROKE;
    let long = (300..=410).contains(&x) && ((x - 300) + (y - 310)).abs() <= STROKE;
    short || long
}

fn cross(x: i32, y: i32) -> bool {
    let (x0, y0, x1, y1) = (226, 146, 414, 334);
    if x < x0 || x >= x1 || y < y0 || y >= y1 {
        return false;
    }
    let (u, v) = (x - x0, y - y0);
    (u - v).abs() <= STROKE || (u + v - (x1 - x0 - 1)).abs() <= STROKE
}
