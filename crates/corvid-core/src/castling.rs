//! Castling rights, the per-square spoiler masks, and castling geometry.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Which wing a castle goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// Four castling permissions packed in the low nibble.
///
/// Bit 0 = white king side, 1 = white queen side, 2 = black king side,
/// 3 = black queen side. The raw value doubles as the Zobrist castling index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleSide {
    /// Wing of a castle, read from the king's destination file.
    #[inline]
    pub const fn from_king_destination(to: Square) -> CastleSide {
        if to.file() >= 4 { CastleSide::King } else { CastleSide::Queen }
    }
}

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn bit(color: Color, side: CastleSide) -> u8 {
        let shift = color.index() as u8 * 2
            + match side {
                CastleSide::King => 0,
                CastleSide::Queen => 1,
            };
        1 << shift
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::bit(color, side))
    }

    /// Apply the spoiler masks of both endpoints of a move.
    #[inline]
    pub const fn spoiled_by(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & SPOILERS[from.index()] & SPOILERS[to.index()])
    }

    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => return Err(FenError::InvalidCastling { found: s.to_string() }),
            };
            rights = rights.with(color, side);
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (c, color, side) in [
            ('K', Color::White, CastleSide::King),
            ('Q', Color::White, CastleSide::Queen),
            ('k', Color::Black, CastleSide::King),
            ('q', Color::Black, CastleSide::Queen),
        ] {
            if self.has(color, side) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}

/// Per-square mask ANDed into the rights whenever a move touches the square.
/// King home squares clear both rights of that color, rook home squares one.
const SPOILERS: [u8; 64] = {
    let mut table = [0b1111u8; 64];
    table[Square::E1.index()] = 0b1100;
    table[Square::H1.index()] = 0b1110;
    table[Square::A1.index()] = 0b1101;
    table[Square::E8.index()] = 0b0011;
    table[Square::H8.index()] = 0b1011;
    table[Square::A8.index()] = 0b0111;
    table
};

/// Fixed squares involved in one of the four castles.
#[derive(Debug, Clone, Copy)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub must_be_empty: Bitboard,
    /// Square the king crosses; it must not be attacked.
    pub crossed: Square,
}

impl CastlePath {
    pub fn of(color: Color, side: CastleSide) -> &'static CastlePath {
        &CASTLE_PATHS[color.index() * 2
            + match side {
                CastleSide::King => 0,
                CastleSide::Queen => 1,
            }]
    }
}

static CASTLE_PATHS: [CastlePath; 4] = [
    CastlePath {
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        must_be_empty: Bitboard::new(Square::F1.bitboard().bits() | Square::G1.bitboard().bits()),
        crossed: Square::F1,
    },
    CastlePath {
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        must_be_empty: Bitboard::new(
            Square::B1.bitboard().bits() | Square::C1.bitboard().bits() | Square::D1.bitboard().bits(),
        ),
        crossed: Square::D1,
    },
    CastlePath {
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        must_be_empty: Bitboard::new(Square::F8.bitboard().bits() | Square::G8.bitboard().bits()),
        crossed: Square::F8,
    },
    CastlePath {
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        must_be_empty: Bitboard::new(
            Square::B8.bitboard().bits() | Square::C8.bitboard().bits() | Square::D8.bitboard().bits(),
        ),
        crossed: Square::D8,
    },
];

#[cfg(test)]
mod tests {
    use super::{CastlePath, CastleRights, CastleSide};
    use crate::color::Color;
    use crate::square::Square;

    #[test]
    fn fen_roundtrip() {
        for s in ["KQkq", "Kq", "k", "-", "KQ"] {
            assert_eq!(CastleRights::from_fen(s).unwrap().to_string(), s);
        }
        assert!(CastleRights::from_fen("KX").is_err());
    }

    #[test]
    fn king_move_spoils_both_rights() {
        let rights = CastleRights::ALL.spoiled_by(Square::E1, Square::E2);
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
    }

    #[test]
    fn rook_capture_spoils_victim_right() {
        // A piece landing on h8 removes black's king-side right.
        let rights = CastleRights::ALL.spoiled_by(Square::B2, Square::H8);
        assert!(!rights.has(Color::Black, CastleSide::King));
        assert_eq!(rights.bits(), 0b1011);
    }

    #[test]
    fn unrelated_squares_keep_rights() {
        assert_eq!(CastleRights::ALL.spoiled_by(Square::D2, Square::D4), CastleRights::ALL);
    }

    #[test]
    fn paths_are_consistent() {
        let path = CastlePath::of(Color::Black, CastleSide::Queen);
        assert_eq!(path.king_to, Square::C8);
        assert!(path.must_be_empty.contains(Square::B8));
        assert!(path.must_be_empty.contains(path.crossed));
        assert_eq!(CastlePath::of(Color::White, CastleSide::King).rook_from, Square::H1);
    }
}
