//! Per-lane hit flash, purely cosmetic.

use super::LANES;

pub const FLASH_TICKS: u8 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitFlash {
    pub flashing: bool,
    pub decay: u8,
}

#[derive(Clone, Debug, Default)]
pub struct HitFlashes {
    lanes: [HitFlash; LANES],
}

impl HitFlashes {
    pub fn lane(&self, lane: usize) -> HitFlash {
        self.lanes[lane]
    }

    pub fn arm(&mut self, lane: usize) {
        self.lanes[lane] = HitFlash { flashing: true, decay: FLASH_TICKS };
    }

    /// Count every lane down by one tick; a lane reaching 0 stops flashing.
    pub fn decay(&mut self) {
        for f in self.lanes.iter_mut().filter(|f| f.flashing) {
            f.decay = f.decay.saturating_sub(1);
            if f.decay == 0 {
                f.flashing = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_lasts_eight_ticks() {
        let mut f = HitFlashes::default();
        f.arm(2);
        for _ in 0..7 {
            f.decay();
            assert!(f.lane(2).flashing);
        }
        f.decay();
        assert_eq!(f.lane(2), HitFlash { flashing: false, decay: 0 });
        assert!(!f.lane(0).flashing);
    }
}
