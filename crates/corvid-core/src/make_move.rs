//! Applying and taking back moves on a [`Position`].

use crate::attacks::pawn_attacks;
use crate::castling::{CastlePath, CastleRights, CastleSide};
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::position::{MAX_GAME_PLY, Position, Undo};
use crate::square::Square;
use crate::zobrist;

impl Position {
    /// Square of the pawn removed by an en-passant capture landing on `to`.
    #[inline]
    fn en_passant_victim(to: Square, mover: Color) -> Square {
        to.offset(-mover.forward())
    }

    #[inline]
    fn set_en_passant(&mut self, ep: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= zobrist::en_passant(old);
        }
        if let Some(new) = ep {
            self.hash ^= zobrist::en_passant(new);
        }
        self.en_passant = ep;
    }

    #[inline]
    fn set_castling(&mut self, rights: CastleRights) {
        if rights != self.castling {
            self.hash ^= zobrist::castling(self.castling) ^ zobrist::castling(rights);
            self.castling = rights;
        }
    }

    #[inline]
    fn flip_side(&mut self) {
        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::black_to_move();
    }

    /// Apply `mv` and report whether the mover's king is safe afterwards.
    ///
    /// Illegal moves are applied in full; the caller must take them back
    /// with [`unmake_move`](Position::unmake_move). `mv` must be
    /// pseudo-legal in this position.
    pub fn make_move(&mut self, mv: Move) -> bool {
        debug_assert!(self.history.len() < MAX_GAME_PLY, "irreversible stack exhausted");

        let us = self.side_to_move;
        let them = !us;
        let (from, to) = (mv.from(), mv.to());
        let moving = self.squares[from.index()].expect("make_move from an empty square");

        let captured = match mv.kind() {
            MoveKind::Capture if mv.is_en_passant() => Some(Piece::new(PieceKind::Pawn, them)),
            MoveKind::Capture | MoveKind::Promotion => self.squares[to.index()],
            MoveKind::Quiet | MoveKind::Castle => None,
        };

        self.history.push(Undo {
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        });

        self.set_en_passant(None);
        self.halfmove_clock += 1;

        let mut castle_path = None;
        match mv.kind() {
            MoveKind::Quiet => self.move_piece(from, to),
            MoveKind::Capture => {
                let victim = if mv.is_en_passant() { Self::en_passant_victim(to, us) } else { to };
                self.remove_piece(victim);
                self.move_piece(from, to);
            }
            MoveKind::Castle => {
                let path = CastlePath::of(us, CastleSide::from_king_destination(to));
                self.move_piece(path.king_from, path.king_to);
                self.move_piece(path.rook_from, path.rook_to);
                castle_path = Some(path);
            }
            MoveKind::Promotion => {
                if captured.is_some() {
                    self.remove_piece(to);
                }
                self.remove_piece(from);
                let promoted = mv.promotion_piece().unwrap_or(PieceKind::Queen);
                self.put_piece(Piece::new(promoted, us), to);
            }
        }

        if moving.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        }

        self.set_castling(self.castling.spoiled_by(from, to));

        // A double push only records its target when an enemy pawn could take it.
        if moving.kind == PieceKind::Pawn && from.index().abs_diff(to.index()) == 16 {
            let target = from.offset(us.forward());
            if (pawn_attacks(us, target) & self.pieces(PieceKind::Pawn, them)).is_nonempty() {
                self.set_en_passant(Some(target));
            }
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.flip_side();

        let king = self.king_square(us);
        let mut legal = !self.is_square_attacked(king, them);
        if let Some(path) = castle_path {
            legal = legal
                && !self.is_square_attacked(path.king_from, them)
                && !self.is_square_attacked(path.crossed, them);
        }
        legal
    }

    /// Take back `mv`, which must be the last move made.
    pub fn unmake_move(&mut self, mv: Move) {
        let undo = self.history.pop().expect("unmake_move without a matching make_move");

        self.flip_side();
        let us = self.side_to_move;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        self.set_en_passant(undo.en_passant);
        self.set_castling(undo.castling);
        self.halfmove_clock = undo.halfmove_clock;

        let (from, to) = (mv.from(), mv.to());
        match mv.kind() {
            MoveKind::Quiet => self.move_piece(to, from),
            MoveKind::Capture => {
                self.move_piece(to, from);
                if let Some(victim) = undo.captured {
                    let sq = if mv.is_en_passant() { Self::en_passant_victim(to, us) } else { to };
                    self.put_piece(victim, sq);
                }
            }
            MoveKind::Castle => {
                let path = CastlePath::of(us, CastleSide::from_king_destination(to));
                self.move_piece(path.rook_to, path.rook_from);
                self.move_piece(path.king_to, path.king_from);
            }
            MoveKind::Promotion => {
                self.remove_piece(to);
                self.put_piece(Piece::new(PieceKind::Pawn, us), from);
                if let Some(victim) = undo.captured {
                    self.put_piece(victim, to);
                }
            }
        }

        debug_assert_eq!(self.hash, undo.hash, "unmake_move did not restore the hash");
    }

    /// Pass the move, for null-move pruning. Must not be used in check.
    pub fn make_null_move(&mut self) {
        debug_assert!(self.history.len() < MAX_GAME_PLY, "irreversible stack exhausted");
        self.history.push(Undo {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        });
        self.set_en_passant(None);
        self.halfmove_clock += 1;
        self.flip_side();
    }

    pub fn unmake_null_move(&mut self) {
        let undo = self.history.pop().expect("unmake_null_move without a matching make_null_move");
        self.flip_side();
        self.set_en_passant(undo.en_passant);
        self.halfmove_clock = undo.halfmove_clock;
    }
}

#[cfg(test)]
mod tests {
    use crate::chess_move::Move;
    use crate::color::Color;
    use crate::piece::{Piece, PieceKind};
    use crate::position::Position;
    use crate::square::Square;

    fn play(pos: &mut Position, mv: Move) {
        let before = pos.clone();
        assert!(pos.make_move(mv), "{mv} should be legal");
        assert_eq!(pos.hash(), pos.compute_hash());
        assert_eq!(pos.validate(), Ok(()));
        let after = pos.clone();
        pos.unmake_move(mv);
        assert_eq!(*pos, before, "unmake of {mv} did not restore the position");
        *pos = after;
    }

    #[test]
    fn double_push_without_adjacent_enemy_sets_no_ep() {
        let mut pos = Position::startpos();
        play(&mut pos, Move::quiet(Square::E2, Square::E4));
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn double_push_next_to_enemy_pawn_sets_ep() {
        let mut pos: Position = "4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1".parse().unwrap();
        play(&mut pos, Move::quiet(Square::E2, Square::E4));
        assert_eq!(pos.en_passant(), Some(Square::E3));
        play(&mut pos, Move::en_passant(Square::D4, Square::E3));
        assert_eq!(pos.piece_on(Square::E4), None);
        assert_eq!(pos.piece_on(Square::E3), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10".parse().unwrap();
        play(&mut pos, Move::castle(Square::E1, Square::G1));
        assert_eq!(pos.piece_on(Square::F1), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert_eq!(pos.piece_on(Square::H1), None);
        assert_eq!(pos.castling().to_string(), "kq");
        assert_eq!(pos.halfmove_clock(), 4);
        play(&mut pos, Move::castle(Square::E8, Square::C8));
        assert_eq!(pos.piece_on(Square::D8), Some(Piece::new(PieceKind::Rook, Color::Black)));
        assert_eq!(pos.castling().to_string(), "-");
    }

    #[test]
    fn castling_through_attack_is_illegal() {
        // The black rook on f8 covers f1.
        let mut pos: Position = "4kr2/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        let before = pos.clone();
        let mv = Move::castle(Square::E1, Square::G1);
        assert!(!pos.make_move(mv));
        pos.unmake_move(mv);
        assert_eq!(pos, before);
    }

    #[test]
    fn castling_out_of_check_is_illegal() {
        let mut pos: Position = "4k3/8/8/8/8/8/8/r3K2R w K - 0 1".parse().unwrap();
        let mv = Move::castle(Square::E1, Square::G1);
        assert!(!pos.make_move(mv));
        pos.unmake_move(mv);
    }

    #[test]
    fn capture_promotion_roundtrip() {
        let mut pos: Position = "1r2k3/P7/8/8/8/8/8/4K3 w - - 5 40".parse().unwrap();
        play(&mut pos, Move::promotion(Square::A7, Square::B8, PieceKind::Knight));
        assert_eq!(pos.piece_on(Square::B8), Some(Piece::new(PieceKind::Knight, Color::White)));
        assert_eq!(pos.pieces(PieceKind::Rook, Color::Black).count(), 0);
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn rook_capture_spoils_opponent_castling() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        play(&mut pos, Move::capture(Square::H1, Square::H8));
        assert_eq!(pos.castling().to_string(), "Qq");
    }

    #[test]
    fn pinned_piece_move_is_illegal_and_fully_undone() {
        let mut pos: Position = "4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let before = pos.clone();
        let mv = Move::quiet(Square::E2, Square::C3);
        assert!(!pos.make_move(mv));
        pos.unmake_move(mv);
        assert_eq!(pos, before);
    }

    #[test]
    fn null_move_roundtrip() {
        let mut pos: Position = "4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.make_move(Move::quiet(Square::E2, Square::E4)));
        let before = pos.clone();
        pos.make_null_move();
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.hash(), pos.compute_hash());
        pos.unmake_null_move();
        assert_eq!(pos, before);
    }
}
