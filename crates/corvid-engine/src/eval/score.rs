//! Middlegame/endgame score pairs.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A pair of centipawn values blended by game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub mg: i32,
    pub eg: i32,
}

/// Shorthand constructor, used by the tables.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i32, eg: i32) -> Score {
    Score { mg, eg }
}

impl Score {
    pub const ZERO: Score = S(0, 0);

    /// Blend by `phase` in `0..=max_phase`; `max_phase` is pure middlegame.
    #[inline]
    pub fn taper(self, phase: i32, max_phase: i32) -> i32 {
        (self.mg * phase + self.eg * (max_phase - phase)) / max_phase
    }
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        S(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        S(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        S(-self.mg, -self.eg)
    }
}
