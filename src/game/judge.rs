//! Button edge detection and hit-window judgment.

use super::pool::{NotePool, SlotHandle};
use super::score::Judgment;
use super::LANES;

pub const HIT_WINDOW_TOP: u16 = 360;
pub const HIT_WINDOW_BOTTOM: u16 = 460;
pub const HIT_WINDOW_MID: u16 = 410;
pub const PERFECT_RANGE: u16 = 4;
pub const GOOD_RANGE: u16 = 10;

/// Raw 4-bit button mask, bit n = lane n pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons(u8);

impl Buttons {
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn pressed(self, lane: usize) -> bool {
        self.0 & (1 << lane) != 0
    }

    pub fn set(&mut self, lane: usize, down: bool) {
        if down {
            self.0 |= 1 << lane;
        } else {
            self.0 &= !(1 << lane);
        }
    }

    /// Lanes pressed now that were released in `prev`.
    pub fn rising(self, prev: Buttons) -> Buttons {
        Buttons(self.0 & !prev.0)
    }

    pub fn lanes(self) -> impl Iterator<Item = usize> {
        (0..LANES).filter(move |&l| self.pressed(l))
    }
}

/// Accuracy class for a note center `distance` pixels from the window midpoint.
pub fn classify(distance: u16) -> Judgment {
    if distance <= PERFECT_RANGE {
        Judgment::Perfect
    } else if distance <= GOOD_RANGE {
        Judgment::Good
    } else {
        Judgment::Ok
    }
}

/// Best candidate for a press in `lane`: the active note overlapping the hit
/// window whose center is nearest the midpoint. Ties keep the earlier slot.
pub fn best_candidate(pool: &NotePool, lane: u8) -> Option<(SlotHandle, u16)> {
    let mut best: Option<(SlotHandle, u16)> = None;
    for (handle, note) in pool.active() {
        if note.lane != lane || !note.overlaps(HIT_WINDOW_TOP, HIT_WINDOW_BOTTOM) {
            continue;
        }
        let dist = note.center().abs_diff(HIT_WINDOW_MID);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((handle, dist));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_edges_only() {
        let prev = Buttons::from_bits(0b0011);
        let now = Buttons::from_bits(0b0110);
        assert_eq!(now.rising(prev).bits(), 0b0100);
        assert_eq!(now.rising(prev).lanes().collect::<Vec<_>>(), vec![2]);
        assert_eq!(Buttons::from_bits(0xFF).bits(), 0x0F);
    }

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify(0), Judgment::Perfect);
        assert_eq!(classify(4), Judgment::Perfect);
        assert_eq!(classify(5), Judgment::Good);
        assert_eq!(classify(10), Judgment::Good);
        assert_eq!(classify(11), Judgment::Ok);
    }

    #[test]
    fn test_best_candidate_nearest_center() {
        let mut pool = NotePool::default();
        pool.place(0, 1, 340); // center 356, distance 54
        pool.place(1, 1, 392); // center 408, distance 2
        pool.place(2, 2, 394); // other lane
        let (h, d) = best_candidate(&pool, 1).unwrap();
        assert_eq!((h.index(), d), (1, 2));
        assert!(best_candidate(&pool, 3).is_none());
    }

    #[test]
    fn test_best_candidate_tie_keeps_scan_order() {
        let mut pool = NotePool::default();
        pool.place(4, 0, 390); // center 406
        pool.place(7, 0, 398); // center 414
        let (h, d) = best_candidate(&pool, 0).unwrap();
        assert_eq!((h.index(), d), (4, 4));
    }

    #[test]
    fn test_note_outside_window_is_ignored() {
        let mut pool = NotePool::default();
        pool.place(0, 0, 100);
        pool.place(1, 0, 470);
        assert!(best_candidate(&pool, 0).is_none());
    }
}
