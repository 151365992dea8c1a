//! Score, combo and judgment bookkeeping. All arithmetic saturates.

pub const SCORE_MAX: u8 = 255;
pub const COMBO_MAX: u16 = 999;
pub const MISS_PENALTY: u8 = 2;

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Judgment {
    #[default]
    Miss,
    Ok,
    Good,
    Perfect,
}

impl Judgment {
    pub fn base_points(self) -> u8 {
        match self {
            Judgment::Perfect => 2,
            Judgment::Good => 1,
            Judgment::Ok | Judgment::Miss => 0,
        }
    }
}

/// Multiplier tier: 0 below combo 10, 1 for 10..20, 2 from 20 on.
pub fn combo_tier(combo: u16) -> u8 {
    match combo {
        0..=9 => 0,
        10..=19 => 1,
        _ => 2,
    }
}

/// Multiplier in tenths for a tier (x1.0, x1.1, x1.2).
pub fn multiplier_x10(tier: u8) -> u16 {
    match tier {
        0 => 10,
        1 => 11,
        _ => 12,
    }
}

/// Points for a hit: `(base * mult_x10 + 5) / 10`, kept bit-exact.
pub fn points_for(judgment: Judgment, combo: u16) -> u8 {
    let base = judgment.base_points() as u16;
    ((base * multiplier_x10(combo_tier(combo)) + 5) / 10) as u8
}

/// Per-judgment tallies for the status readout.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub miss: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ScoreState {
    pub score: u8,
    pub combo: u16,
    pub max_combo: u16,
    pub last_judgment: Judgment,
    pub tally: Tally,
}

impl ScoreState {
    /// Fallen-off note or mis-press.
    pub fn miss(&mut self) {
        self.score = self.score.saturating_sub(MISS_PENALTY);
        self.combo = 0;
        self.last_judgment = Judgment::Miss;
        self.tally.miss += 1;
    }

    /// Successful judgment. The multiplier uses the combo before this hit.
    pub fn hit(&mut self, judgment: Judgment) {
        let gain = points_for(judgment, self.combo);
        // u8 saturation is the SCORE_MAX cap.
        self.score = self.score.saturating_add(gain);
        self.combo = (self.combo + 1).min(COMBO_MAX);
        self.max_combo = self.max_combo.max(self.combo);
        self.last_judgment = judgment;
        match judgment {
            Judgment::Perfect => self.tally.perfect += 1,
            Judgment::Good => self.tally.good += 1,
            Judgment::Ok => self.tally.ok += 1,
            Judgment::Miss => self.tally.miss += 1,
        }
    }

    pub fn combo_tier(&self) -> u8 {
        combo_tier(self.combo)
    }
}
