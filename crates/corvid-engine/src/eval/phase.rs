//! Game phase from the non-pawn material left on the board.

use corvid_core::{PieceKind, Position};

/// Phase of the starting material: four minors at 1, four rooks at 2, two queens at 4.
pub const MAX_PHASE: i32 = 24;

const PHASE_WEIGHT: [i32; PieceKind::COUNT] = [0, 1, 1, 2, 4, 0];

/// `MAX_PHASE` for a full middlegame set, 0 for kings and pawns only.
/// Promotions cannot push it past the maximum.
pub fn game_phase(pos: &Position) -> i32 {
    let phase: i32 = PieceKind::ALL
        .iter()
        .map(|&kind| PHASE_WEIGHT[kind.index()] * pos.kind_bb(kind).count() as i32)
        .sum();
    phase.min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use corvid_core::Position;

    use super::{MAX_PHASE, game_phase};

    #[test]
    fn startpos_is_full_phase() {
        assert_eq!(game_phase(&Position::startpos()), MAX_PHASE);
    }

    #[test]
    fn pawn_ending_is_zero() {
        let pos: Position = "8/4kp2/8/8/8/8/4KP2/8 w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&pos), 0);
    }

    #[test]
    fn queens_off() {
        let pos: Position = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(game_phase(&pos), 16);
    }
}
