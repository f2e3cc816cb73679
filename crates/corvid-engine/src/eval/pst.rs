//! Material values and piece-square tables.
//!
//! Tables are laid out as seen from White's side of the board: the first
//! row is rank 8, the last row rank 1. [`pst`] handles the flip.

use corvid_core::{Color, PieceKind, Square};

use crate::eval::score::{S, Score};

/// Indexed by [`PieceKind::index`].
pub const MATERIAL: [Score; PieceKind::COUNT] = [
    S(100, 120),
    S(320, 300),
    S(330, 315),
    S(500, 530),
    S(950, 980),
    S(0, 0),
];

#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     90,  90,  85,  80,  80,  85,  90,  90,
     50,  50,  45,  40,  40,  45,  50,  50,
     25,  25,  20,  20,  20,  20,  25,  25,
     10,  10,  10,  10,  10,  10,  10,  10,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];

const fn pair(mg: &[i32; 64], eg: &[i32; 64]) -> [Score; 64] {
    let mut table = [Score::ZERO; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = S(mg[i], eg[i]);
        i += 1;
    }
    table
}

static TABLES: [[Score; 64]; PieceKind::COUNT] = [
    pair(&PAWN_MG, &PAWN_EG),
    pair(&KNIGHT, &KNIGHT),
    pair(&BISHOP, &BISHOP),
    pair(&ROOK, &ROOK),
    pair(&QUEEN, &QUEEN),
    pair(&KING_MG, &KING_EG),
];

/// Positional bonus of a `color` piece of `kind` standing on `sq`.
#[inline]
pub fn pst(kind: PieceKind, color: Color, sq: Square) -> Score {
    // Row 0 of each table is rank 8, so White reads it vertically flipped.
    let row_index = match color {
        Color::White => sq.index() ^ 56,
        Color::Black => sq.index(),
    };
    TABLES[kind.index()][row_index]
}

#[cfg(test)]
mod tests {
    use corvid_core::{Color, PieceKind, Square};

    use super::pst;
    use crate::eval::score::S;

    #[test]
    fn white_reads_from_rank_one() {
        assert_eq!(pst(PieceKind::King, Color::White, Square::G1), S(30, -30));
        assert_eq!(pst(PieceKind::Pawn, Color::White, Square::E4), S(20, 10));
        assert_eq!(pst(PieceKind::Pawn, Color::White, Square::A7), S(50, 90));
    }

    #[test]
    fn colors_mirror() {
        for kind in PieceKind::ALL {
            for sq in Square::all() {
                let mirrored = Square::from_coords(sq.file(), 7 - sq.rank());
                assert_eq!(pst(kind, Color::White, sq), pst(kind, Color::Black, mirrored));
            }
        }
    }
}
