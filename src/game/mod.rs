//! Frame-synchronous game core.
//!
//! One call to [`Game::on_frame_tick`] commits a whole tick: round control,
//! difficulty, note fall and expiry, judgment, then spawning. Pixel queries
//! borrow the game immutably, so they can only ever observe a committed tick.
//! Nothing in here logs or fails; out-of-range arithmetic saturates.

pub mod flash;
pub mod judge;
pub mod pool;
pub mod round;
pub mod score;
pub mod spawner;

use crate::render::{self, Rgb};
use flash::HitFlashes;
use judge::Buttons;
use pool::NotePool;
use round::{RoundPhase, RoundState};
use score::{Judgment, ScoreState, Tally};
use spawner::Spawner;

pub const SCREEN_WIDTH: u16 = 640;
pub const SCREEN_HEIGHT: u16 = 480;
pub const LANES: usize = 4;
pub const LANE_WIDTH: u16 = 80;
/// Left edge of lane 0.
pub const PLAYFIELD_LEFT: u16 = 160;
pub const NOTE_WIDTH: u16 = 64;
pub const NOTE_HEIGHT: u16 = 32;

/// Left edge of a lane in screen pixels.
pub fn lane_left(lane: usize) -> u16 {
    PLAYFIELD_LEFT + lane as u16 * LANE_WIDTH
}

/// Diagnostic readout handed to the display layer.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub buttons: u8,
    pub score: u8,
    pub combo: u16,
    pub max_combo: u16,
    pub last_judgment: Judgment,
    pub frame_counter: u16,
    pub phase: RoundPhase,
    pub live_notes: u8,
    pub tally: Tally,
}

/// Complete game state. Mutated only by `on_frame_tick` and `reset`.
#[derive(Clone, Debug, Default)]
pub struct Game {
    round: RoundState,
    score: ScoreState,
    pool: NotePool,
    spawner: Spawner,
    flashes: HitFlashes,
    buttons: Buttons,
    prev_buttons: Buttons,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the power-on state: round active, empty pool, seeded spawner.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn pool(&self) -> &NotePool {
        &self.pool
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn flashes(&self) -> &HitFlashes {
        &self.flashes
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Run exactly one tick with the button mask sampled at its start.
    pub fn on_frame_tick(&mut self, buttons: Buttons) {
        self.buttons = buttons;
        if self.round.is_active() && self.round.step(self.score.score).is_none() {
            self.update_playfield();
        }
        self.prev_buttons = buttons;
    }

    fn update_playfield(&mut self) {
        let speed = round::fall_speed(&self.round, self.score.score);
        let interval = round::spawn_interval(&self.round, self.score.score);

        self.flashes.decay();

        for _ in 0..self.pool.advance(speed) {
            self.score.miss();
        }

        let edges = self.buttons.rising(self.prev_buttons);
        for lane in edges.lanes() {
            match judge::best_candidate(&self.pool, lane as u8) {
                Some((handle, distance)) => {
                    let judgment = judge::classify(distance);
                    self.pool.deactivate(handle);
                    self.score.hit(judgment);
                    self.flashes.arm(lane);
                }
                None => self.score.miss(),
            }
        }

        if self.spawner.countdown(interval) {
            let lane = self.spawner.pick_lane();
            if self.pool.spawn(lane).is_some() {
                self.spawner.commit(lane);
            }
        }
        self.spawner.lfsr.step();
    }

    /// Color at `(x, y)` for the committed state. Pure; safe to call any
    /// number of times between ticks.
    pub fn query_pixel(&self, x: u16, y: u16) -> Rgb {
        render::pixel(self, x, y)
    }

    pub fn status(&self) -> Status {
        Status {
            buttons: self.buttons.bits(),
            score: self.score.score,
            combo: self.score.combo,
            max_combo: self.score.max_combo,
            last_judgment: self.score.last_judgment,
            frame_counter: self.round.frame_counter,
            phase: self.round.phase,
            live_notes: self.pool.live_count() as u8,
            tally: self.score.tally,
        }
    }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut RoundState, &mut ScoreState, &mut NotePool) {
        (&mut self.round, &mut self.score, &mut self.pool)
    }
}
