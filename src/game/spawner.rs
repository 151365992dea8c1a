//! Lane spawner: a 4-bit feedback shift register plus a round-robin lane
//! selector. The register is not a general PRNG; its exact sequence decides
//! which lanes cluster, so the width, taps and seed are fixed.

use super::LANES;

/// Seed loaded into the feedback register on reset (must be nonzero).
pub const LFSR_SEED: u8 = 0b1001;
/// Countdown loaded on reset before the first spawn.
pub const INITIAL_SPAWN_TIMER: u16 = 30;
/// Longest same-lane streak counter value; a streak of 2 means three notes in a row.
pub const MAX_STREAK: u8 = 2;

/// 4-bit shift register: new bit = bit3 ^ bit2, shifted in at bit0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lfsr4(u8);

impl Lfsr4 {
    pub fn new(seed: u8) -> Self {
        Self(seed & 0x0F)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn low_bit(self) -> bool {
        self.0 & 1 == 1
    }

    pub fn step(&mut self) {
        let feedback = ((self.0 >> 3) ^ (self.0 >> 2)) & 1;
        self.0 = ((self.0 << 1) | feedback) & 0x0F;
    }
}

/// Spawner registers. Lanes are plain `u8` indices in `0..LANES`.
#[derive(Clone, Debug)]
pub struct Spawner {
    pub timer: u16,
    pub lane_selector: u8,
    pub last_lane: u8,
    pub streak: u8,
    pub lfsr: Lfsr4,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            timer: INITIAL_SPAWN_TIMER,
            lane_selector: 0,
            last_lane: 0,
            streak: 0,
            lfsr: Lfsr4::new(LFSR_SEED),
        }
    }
}

impl Spawner {
    /// Advance the countdown by one tick. Returns true when a spawn fires;
    /// the timer is then reloaded with `interval`.
    pub fn countdown(&mut self, interval: u16) -> bool {
        if self.timer == 0 {
            self.timer = interval;
            true
        } else {
            self.timer -= 1;
            false
        }
    }

    /// Lane the next spawn would use, read from the current register value.
    pub fn pick_lane(&self) -> u8 {
        if self.lfsr.low_bit() && self.streak < MAX_STREAK {
            self.last_lane
        } else {
            self.lane_selector
        }
    }

    /// Streak and selector bookkeeping after a note actually entered the pool.
    pub fn commit(&mut self, lane: u8) {
        if lane == self.last_lane {
            self.streak = (self.streak + 1).min(MAX_STREAK);
        } else {
            self.streak = 0;
            self.last_lane = lane;
        }
        self.lane_selector = (self.lane_selector + 1) % LANES as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfsr_sequence_from_seed() {
        let mut r = Lfsr4::new(LFSR_SEED);
        let mut seen = Vec::new();
        for _ in 0..16 {
            seen.push(r.value());
            r.step();
        }
        assert_eq!(
            seen,
            vec![9, 3, 6, 13, 10, 5, 11, 7, 15, 14, 12, 8, 1, 2, 4, 9]
        );
    }

    #[test]
    fn test_lfsr_never_reaches_zero() {
        let mut r = Lfsr4::new(LFSR_SEED);
        for _ in 0..100 {
            r.step();
            assert_ne!(r.value(), 0);
        }
    }

    #[test]
    fn test_countdown_reloads_on_fire() {
        let mut s = Spawner { timer: 1, ..Spawner::default() };
        assert!(!s.countdown(28));
        assert_eq!(s.timer, 0);
        assert!(s.countdown(28));
        assert_eq!(s.timer, 28);
    }

    #[test]
    fn test_streak_caps_and_forces_selector() {
        let mut s = Spawner::default();
        // Force a register value with the low bit set.
        s.lfsr = Lfsr4::new(0b0001);
        s.last_lane = 2;
        s.lane_selector = 1;
        assert_eq!(s.pick_lane(), 2);
        s.commit(2);
        s.commit(2);
        assert_eq!(s.streak, MAX_STREAK);
        // Streak exhausted: selector wins even though the low bit is set.
        assert_eq!(s.pick_lane(), 3);
    }

    #[test]
    fn test_commit_new_lane_resets_streak() {
        let mut s = Spawner::default();
        s.commit(0);
        assert_eq!(s.streak, 1);
        s.commit(3);
        assert_eq!(s.streak, 0);
        assert_eq!(s.last_lane, 3);
        assert_eq!(s.lane_selector, 2);
    }
}
