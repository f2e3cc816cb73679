//! The mutable board state searched by the engine.

use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castling::CastleRights;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// Longest supported game line, counted in plies since the position was loaded.
///
/// Callers that play external move lists must stay below this, and the search
/// adds at most `MAX_PLY` on top of the game line.
pub const MAX_GAME_PLY: usize = 1024;

/// State that cannot be re-derived when a move is taken back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Undo {
    pub(crate) captured: Option<Piece>,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    /// Key of the position the move was made from. Only read for repetition
    /// detection; unmake restores the hash by replaying XOR deltas.
    pub(crate) hash: u64,
}

/// A chess position that is mutated in place by [`make_move`](Position::make_move)
/// and restored by [`unmake_move`](Position::unmake_move).
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
    pub(crate) sides: [Bitboard; Color::COUNT],
    pub(crate) squares: [Option<Piece>; Square::COUNT],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
    /// One entry per ply made since the position was loaded.
    pub(crate) history: Vec<Undo>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Position {
    /// An empty board with white to move and no rights.
    pub(crate) fn empty() -> Position {
        Position {
            pieces: [[Bitboard::EMPTY; PieceKind::COUNT]; Color::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            squares: [None; Square::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            history: Vec::with_capacity(MAX_GAME_PLY),
        }
    }

    pub fn startpos() -> Position {
        let mut pos = Position::empty();
        for file in 0..8u8 {
            let kind = BACK_RANK[file as usize];
            pos.put_piece(Piece::new(kind, Color::White), Square::from_coords(file, 0));
            pos.put_piece(Piece::new(PieceKind::Pawn, Color::White), Square::from_coords(file, 1));
            pos.put_piece(Piece::new(PieceKind::Pawn, Color::Black), Square::from_coords(file, 6));
            pos.put_piece(Piece::new(kind, Color::Black), Square::from_coords(file, 7));
        }
        pos.castling = CastleRights::ALL;
        pos.hash = pos.compute_hash();
        pos
    }

    // --- queries ---

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Pieces of `kind` of either color.
    #[inline]
    pub fn kind_bb(&self, kind: PieceKind) -> Bitboard {
        self.pieces[0][kind.index()] | self.pieces[1][kind.index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[0] | self.sides[1]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Plies made since the position was loaded.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Panics if `color` has no king, which a validated position never allows.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(PieceKind::King, color)
            .lsb()
            .expect("position without a king")
    }

    /// True when `color` owns a knight, bishop, rook or queen.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let minors_and_majors = self.pieces(PieceKind::Knight, color)
            | self.pieces(PieceKind::Bishop, color)
            | self.pieces(PieceKind::Rook, color)
            | self.pieces(PieceKind::Queen, color);
        minors_and_majors.is_nonempty()
    }

    /// Whether any piece of `by` attacks `sq`, reading the attack tables backwards.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupied = self.occupied();
        let queens = self.pieces(PieceKind::Queen, by);
        (pawn_attacks(!by, sq) & self.pieces(PieceKind::Pawn, by)).is_nonempty()
            || (knight_attacks(sq) & self.pieces(PieceKind::Knight, by)).is_nonempty()
            || (king_attacks(sq) & self.pieces(PieceKind::King, by)).is_nonempty()
            || (bishop_attacks(sq, occupied) & (self.pieces(PieceKind::Bishop, by) | queens)).is_nonempty()
            || (rook_attacks(sq, occupied) & (self.pieces(PieceKind::Rook, by) | queens)).is_nonempty()
    }

    /// Pieces of both colors attacking `sq`, with sliders blocked by `occupied`.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let diagonal = self.kind_bb(PieceKind::Bishop) | self.kind_bb(PieceKind::Queen);
        let straight = self.kind_bb(PieceKind::Rook) | self.kind_bb(PieceKind::Queen);
        (pawn_attacks(Color::White, sq) & self.pieces(PieceKind::Pawn, Color::Black))
            | (pawn_attacks(Color::Black, sq) & self.pieces(PieceKind::Pawn, Color::White))
            | (knight_attacks(sq) & self.kind_bb(PieceKind::Knight))
            | (king_attacks(sq) & self.kind_bb(PieceKind::King))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & straight)
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        self.is_square_attacked(self.king_square(us), !us)
    }

    /// Hash recomputed from every feature of the position.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = zobrist::castling(self.castling);
        for sq in self.occupied() {
            if let Some(piece) = self.squares[sq.index()] {
                hash ^= zobrist::piece_square(piece, sq);
            }
        }
        if let Some(ep) = self.en_passant {
            hash ^= zobrist::en_passant(ep);
        }
        if self.side_to_move == Color::Black {
            hash ^= zobrist::black_to_move();
        }
        hash
    }

    /// Fifty-move rule: a hundred plies without a capture or pawn move.
    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Repetition draw as seen from a search rooted at ply `root_ply`.
    ///
    /// A single earlier occurrence counts once it lies inside the search
    /// line; occurrences from the game itself need two (threefold).
    pub fn is_repetition(&self, root_ply: usize) -> bool {
        let ply = self.history.len();
        let window = (self.halfmove_clock as usize).min(ply);
        let mut seen = 0;
        let mut back = 2;
        while back <= window {
            let earlier = ply - back;
            if self.history[earlier].hash == self.hash {
                if earlier >= root_ply {
                    return true;
                }
                seen += 1;
                if seen >= 2 {
                    return true;
                }
            }
            back += 2;
        }
        false
    }

    /// Check structural invariants, including the square cache and the hash.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self.pieces(PieceKind::King, color).count();
            if count != 1 {
                let color = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }

        if (self.kind_bb(PieceKind::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut union = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let bb = self.pieces(kind, color);
                if (seen & bb).is_nonempty() {
                    return Err(BoardError::OverlappingPieces);
                }
                seen |= bb;
                union |= bb;
            }
            if union != self.side(color) {
                return Err(BoardError::OverlappingPieces);
            }
        }

        for sq in Square::all() {
            let from_bitboards = Color::ALL.into_iter().find_map(|color| {
                PieceKind::ALL
                    .into_iter()
                    .find(|&kind| self.pieces(kind, color).contains(sq))
                    .map(|kind| Piece::new(kind, color))
            });
            if from_bitboards != self.squares[sq.index()] {
                return Err(BoardError::StaleSquareCache { square: sq.to_string() });
            }
        }

        let them = !self.side_to_move;
        if self.is_square_attacked(self.king_square(them), self.side_to_move) {
            return Err(BoardError::OpponentInCheck);
        }

        let recomputed = self.compute_hash();
        if recomputed != self.hash {
            return Err(BoardError::HashMismatch { incremental: self.hash, recomputed });
        }
        Ok(())
    }

    // --- primitive mutations; each keeps bitboards, cache and hash in step ---

    #[inline]
    pub(crate) fn put_piece(&mut self, piece: Piece, sq: Square) {
        let bb = sq.bitboard();
        self.pieces[piece.color.index()][piece.kind.index()] |= bb;
        self.sides[piece.color.index()] |= bb;
        self.squares[sq.index()] = Some(piece);
        self.hash ^= zobrist::piece_square(piece, sq);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Piece {
        let piece = self.squares[sq.index()]
            .take()
            .expect("remove_piece on an empty square");
        let bb = !sq.bitboard();
        self.pieces[piece.color.index()][piece.kind.index()] &= bb;
        self.sides[piece.color.index()] &= bb;
        self.hash ^= zobrist::piece_square(piece, sq);
        piece
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.remove_piece(from);
        self.put_piece(piece, to);
    }

    /// Multi-line diagram of the board, rank 8 first.
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty(self)
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::startpos()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Helper returned by [`Position::pretty`].
pub struct Pretty<'a>(&'a Position);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self.0.piece_on(Square::from_coords(file, rank)).map_or('.', |p| p.fen_char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "fen: {}\nkey: {:016x}", self.0, self.0.hash)
    }
}
