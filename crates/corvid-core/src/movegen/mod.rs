//! Pseudo-legal move generation.
//!
//! Moves leave legality to [`Position::make_move`], which reports whether the
//! mover's king survived. Castles are emitted when the right is held and the
//! path is empty; attacked transit squares are rejected on make.

mod pawns;
mod pieces;

use crate::chess_move::{Move, ScoredMove};
use crate::position::Position;

/// Which slice of the pseudo-legal moves to emit.
pub trait GenMode {
    /// Quiet moves, castles and under-promotions are only wanted by full nodes.
    const QUIETS: bool;
}

/// Every pseudo-legal move.
pub struct AllMoves;

/// Captures, en-passant captures and queen promotions.
pub struct Tactical;

impl GenMode for AllMoves {
    const QUIETS: bool = true;
}

impl GenMode for Tactical {
    const QUIETS: bool = false;
}

/// Fixed-capacity move buffer; 256 is above the 218-move maximum.
pub struct MoveList {
    moves: [ScoredMove; 256],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList { moves: [ScoredMove::default(); 256], len: 0 }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < self.moves.len());
        self.moves[self.len] = ScoredMove::new(mv);
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [ScoredMove] {
        &mut self.moves[..self.len]
    }

    /// The moves without their scores.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.as_slice().iter().map(|scored| scored.mv)
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.iter().any(|m| m == mv)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

fn generate<M: GenMode>(pos: &Position, list: &mut MoveList) {
    pawns::gen_pawns::<M>(pos, list);
    pieces::gen_pieces::<M>(pos, list);
}

/// Append every pseudo-legal move of the side to move.
pub fn generate_moves(pos: &Position, list: &mut MoveList) {
    generate::<AllMoves>(pos, list);
}

/// Append the tactical moves searched by quiescence.
pub fn generate_captures(pos: &Position, list: &mut MoveList) {
    generate::<Tactical>(pos, list);
}

impl Position {
    /// Fully legal moves, filtered by making and unmaking each candidate.
    pub fn legal_moves(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        generate_moves(self, &mut pseudo);
        let mut legal = MoveList::new();
        for mv in pseudo.iter() {
            if self.make_move(mv) {
                legal.push(mv);
            }
            self.unmake_move(mv);
        }
        legal
    }

    /// Whether the side to move has at least one legal move.
    pub fn has_legal_move(&mut self) -> bool {
        let mut pseudo = MoveList::new();
        generate_moves(self, &mut pseudo);
        pseudo.iter().any(|mv| {
            let legal = self.make_move(mv);
            self.unmake_move(mv);
            legal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveList, generate_captures, generate_moves};
    use crate::chess_move::{Move, MoveKind};
    use crate::fen::STARTING_FEN;
    use crate::piece::PieceKind;
    use crate::position::Position;
    use crate::square::Square;

    fn pseudo(fen: &str) -> MoveList {
        let pos: Position = fen.parse().unwrap();
        let mut list = MoveList::new();
        generate_moves(&pos, &mut list);
        list
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let list = pseudo(STARTING_FEN);
        assert_eq!(list.len(), 20);
        assert!(list.contains(Move::quiet(Square::E2, Square::E4)));
        assert!(list.contains(Move::quiet(Square::G1, Square::F3)));
    }

    #[test]
    fn castles_need_empty_path_only() {
        // f1 is attacked by the f8 rook, but generation does not look at attacks.
        let list = pseudo("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(list.contains(Move::castle(Square::E1, Square::G1)));
        assert!(list.contains(Move::castle(Square::E1, Square::C1)));
        let blocked = pseudo("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert!(!blocked.contains(Move::castle(Square::E1, Square::C1)));
        assert!(blocked.contains(Move::castle(Square::E1, Square::G1)));
    }

    #[test]
    fn promotions_come_in_fours() {
        let list = pseudo("3n3k/4P3/8/8/8/8/8/K7 w - - 0 1");
        let promos = list.iter().filter(|m| m.kind() == MoveKind::Promotion).count();
        // e8 push plus exd8 capture, four pieces each.
        assert_eq!(promos, 8);
    }

    #[test]
    fn en_passant_is_flagged() {
        let list = pseudo("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        assert!(list.contains(Move::en_passant(Square::E5, Square::F6)));
        assert!(!list.contains(Move::en_passant(Square::E5, Square::D6)));
    }

    #[test]
    fn capture_mode_skips_quiets() {
        let pos: Position = "3n3k/4P3/8/8/3p4/4P3/8/K7 w - - 0 1".parse().unwrap();
        let mut list = MoveList::new();
        generate_captures(&pos, &mut list);
        let moves: Vec<Move> = list.iter().collect();
        assert!(moves.contains(&Move::capture(Square::E3, Square::D4)));
        assert!(moves.contains(&Move::promotion(Square::E7, Square::E8, PieceKind::Queen)));
        assert!(moves.contains(&Move::promotion(Square::E7, Square::D8, PieceKind::Queen)));
        assert!(!moves.contains(&Move::promotion(Square::E7, Square::E8, PieceKind::Knight)));
        assert!(moves.iter().all(|m| m.kind() != MoveKind::Quiet));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn legal_filter_removes_pinned_moves() {
        let mut pos: Position = "4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let legal = pos.legal_moves();
        assert!(legal.iter().all(|m| m.from() != Square::E2));
        assert!(pos.has_legal_move());
    }
}
