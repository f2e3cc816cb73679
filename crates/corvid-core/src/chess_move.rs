//! Compact move encoding.
//!
//! A [`Move`] packs into 16 bits:
//!
//! | bits  | field                                                   |
//! |-------|---------------------------------------------------------|
//! | 0-5   | origin square                                           |
//! | 6-11  | destination square                                      |
//! | 12-13 | [`MoveKind`]                                            |
//! | 14-15 | flag: en-passant marker (captures) or promotion piece   |
//!
//! Ordering scores travel beside the move in [`ScoredMove`], so two moves
//! compare equal whenever they describe the same action.

use std::fmt;

use crate::piece::PieceKind;
use crate::square::Square;

const TO_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const FLAG_SHIFT: u32 = 14;
const SQUARE_MASK: u16 = 0x3F;

const EN_PASSANT_FLAG: u16 = 1;

/// Move category stored in bits 12-13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0,
    Capture = 1,
    Castle = 2,
    /// Pawn reaching the last rank, with or without a capture.
    Promotion = 3,
}

impl MoveKind {
    const fn from_bits(bits: u16) -> MoveKind {
        match bits & 3 {
            0 => MoveKind::Quiet,
            1 => MoveKind::Capture,
            2 => MoveKind::Castle,
            _ => MoveKind::Promotion,
        }
    }
}

/// Promotion targets in flag order.
pub const PROMOTION_KINDS: [PieceKind; 4] =
    [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen];

/// A move as an immutable 16-bit value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Placeholder for "no move"; a1a1 can never be generated.
    pub const NULL: Move = Move(0);

    #[inline]
    const fn pack(from: Square, to: Square, kind: MoveKind, flag: u16) -> Move {
        Move(
            from.index() as u16
                | (to.index() as u16) << TO_SHIFT
                | (kind as u16) << KIND_SHIFT
                | flag << FLAG_SHIFT,
        )
    }

    #[inline]
    pub const fn quiet(from: Square, to: Square) -> Move {
        Move::pack(from, to, MoveKind::Quiet, 0)
    }

    #[inline]
    pub const fn capture(from: Square, to: Square) -> Move {
        Move::pack(from, to, MoveKind::Capture, 0)
    }

    /// Pawn capture onto the en-passant square `to`.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Move {
        Move::pack(from, to, MoveKind::Capture, EN_PASSANT_FLAG)
    }

    /// Castle, encoded by the king's own squares.
    #[inline]
    pub const fn castle(from: Square, to: Square) -> Move {
        Move::pack(from, to, MoveKind::Castle, 0)
    }

    /// `piece` must be a knight, bishop, rook or queen.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Move {
        let flag = match piece {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            _ => 3,
        };
        Move::pack(from, to, MoveKind::Promotion, flag)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & SQUARE_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked((self.0 >> TO_SHIFT & SQUARE_MASK) as u8)
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits(self.0 >> KIND_SHIFT)
    }

    #[inline]
    const fn flag(self) -> u16 {
        self.0 >> FLAG_SHIFT
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::Capture) && self.flag() == EN_PASSANT_FLAG
    }

    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self.kind() {
            MoveKind::Promotion => Some(PROMOTION_KINDS[self.flag() as usize]),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`, `0000` for the null move.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}, {:?}", self.kind())?;
        if self.is_en_passant() {
            f.write_str(", ep")?;
        }
        f.write_str(")")
    }
}

/// A move plus the ordering score assigned by the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

impl ScoredMove {
    #[inline]
    pub const fn new(mv: Move) -> ScoredMove {
        ScoredMove { mv, score: 0 }
    }
}
