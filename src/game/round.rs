//! Round controller and score-driven difficulty tiers.

use super::score::SCORE_MAX;

/// Round length in ticks (three minutes at 60 Hz).
pub const ROUND_TICKS: u16 = 10_800;

const MID_TIER_SCORE: u8 = 85;
const HIGH_TIER_SCORE: u8 = 170;

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundPhase {
    #[default]
    Active,
    Won,
    Lost,
}

#[derive(Clone, Debug, Default)]
pub struct RoundState {
    pub frame_counter: u16,
    pub phase: RoundPhase,
}

impl RoundState {
    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn won(&self) -> bool {
        self.phase == RoundPhase::Won
    }

    pub fn lost(&self) -> bool {
        self.phase == RoundPhase::Lost
    }

    /// One controller step. Returns the new terminal phase on the tick the
    /// round ends; terminal rounds never change again.
    pub fn step(&mut self, score: u8) -> Option<RoundPhase> {
        if !self.is_active() {
            return None;
        }
        if score >= SCORE_MAX {
            self.phase = RoundPhase::Won;
            Some(RoundPhase::Won)
        } else if self.frame_counter >= ROUND_TICKS {
            self.phase = RoundPhase::Lost;
            Some(RoundPhase::Lost)
        } else {
            self.frame_counter += 1;
            None
        }
    }

    pub fn remaining(&self) -> u16 {
        ROUND_TICKS.saturating_sub(self.frame_counter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Low,
    Mid,
    High,
}

impl Difficulty {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_TIER_SCORE {
            Difficulty::High
        } else if score >= MID_TIER_SCORE {
            Difficulty::Mid
        } else {
            Difficulty::Low
        }
    }

    pub fn fall_speed(self) -> u16 {
        match self {
            Difficulty::Low => 2,
            Difficulty::Mid => 4,
            Difficulty::High => 6,
        }
    }

    pub fn spawn_interval(self) -> u16 {
        match self {
            Difficulty::Low => 28,
            Difficulty::Mid => 22,
            Difficulty::High => 16,
        }
    }
}

/// Fall speed for the current state; 0 outside an active round.
pub fn fall_speed(round: &RoundState, score: u8) -> u16 {
    if round.is_active() {
        Difficulty::from_score(score).fall_speed()
    } else {
        0
    }
}

/// Spawn interval for the current state; 0 outside an active round.
pub fn spawn_interval(round: &RoundState, score: u8) -> u16 {
    if round.is_active() {
        Difficulty::from_score(score).spawn_interval()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_checked_before_timeout() {
        let mut r = RoundState { frame_counter: ROUND_TICKS, phase: RoundPhase::Active };
        assert_eq!(r.step(SCORE_MAX), Some(RoundPhase::Won));
        assert!(r.won() && !r.lost());
    }

    #[test]
    fn test_timeout_loses() {
        let mut r = RoundState { frame_counter: ROUND_TICKS - 1, phase: RoundPhase::Active };
        assert_eq!(r.step(10), None);
        assert_eq!(r.frame_counter, ROUND_TICKS);
        assert_eq!(r.step(10), Some(RoundPhase::Lost));
        assert_eq!(r.frame_counter, ROUND_TICKS);
    }

    #[test]
    fn test_terminal_is_frozen() {
        let mut r = RoundState { frame_counter: 42, phase: RoundPhase::Lost };
        assert_eq!(r.step(SCORE_MAX), None);
        assert_eq!(r.frame_counter, 42);
        assert!(r.lost());
    }

    #[test]
    fn test_difficulty_thresholds() {
        assert_eq!(Difficulty::from_score(84), Difficulty::Low);
        assert_eq!(Difficulty::from_score(85), Difficulty::Mid);
        assert_eq!(Difficulty::from_score(169), Difficulty::Mid);
        assert_eq!(Difficulty::from_score(170), Difficulty::High);
        let active = RoundState::default();
        assert_eq!(fall_speed(&active, 100), 4);
        assert_eq!(spawn_interval(&active, 200), 16);
        let done = RoundState { frame_counter: 5, phase: RoundPhase::Won };
        assert_eq!(fall_speed(&done, 100), 0);
        assert_eq!(spawn_interval(&done, 100), 0);
    }
}
