//! Static evaluation.
//!
//! The search only sees the [`Evaluator`] trait; [`MaterialPst`] is the
//! default implementation.

pub mod phase;
pub mod pst;
pub mod score;

use corvid_core::{Color, PieceKind, Position};

use self::phase::{MAX_PHASE, game_phase};
use self::pst::{MATERIAL, pst};
use self::score::Score;

/// Scores a quiet position in centipawns from the side to move's view.
pub trait Evaluator {
    fn evaluate(&self, pos: &Position) -> i32;
}

/// Material plus tapered piece-square tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialPst;

impl MaterialPst {
    /// Sum for White minus sum for Black, still as a middlegame/endgame pair.
    pub fn white_score(pos: &Position) -> Score {
        let mut total = Score::ZERO;
        for color in Color::ALL {
            let mut side = Score::ZERO;
            for kind in PieceKind::ALL {
                for sq in pos.pieces(kind, color) {
                    side += MATERIAL[kind.index()] + pst(kind, color, sq);
                }
            }
            match color {
                Color::White => total += side,
                Color::Black => total -= side,
            }
        }
        total
    }
}

impl Evaluator for MaterialPst {
    fn evaluate(&self, pos: &Position) -> i32 {
        let white = Self::white_score(pos).taper(game_phase(pos), MAX_PHASE);
        match pos.side_to_move() {
            Color::White => white,
            Color::Black => -white,
        }
    }
}

#[cfg(test)]
mod tests {
    use corvid_core::Position;

    use super::{Evaluator, MaterialPst};

    #[test]
    fn startpos_is_balanced() {
        assert_eq!(MaterialPst.evaluate(&Position::startpos()), 0);
    }

    #[test]
    fn score_is_from_the_movers_view() {
        // White is a queen up.
        let white: Position = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        let black: Position = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1".parse().unwrap();
        assert!(MaterialPst.evaluate(&white) > 800);
        assert_eq!(MaterialPst.evaluate(&black), -MaterialPst.evaluate(&white));
    }

    #[test]
    fn mirrored_positions_agree() {
        let pos: Position = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3".parse().unwrap();
        let mirror: Position = "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3".parse().unwrap();
        assert_eq!(MaterialPst.evaluate(&pos), MaterialPst.evaluate(&mirror));
    }
}
