use crate::attacks::piece_attacks;
use crate::castling::{CastlePath, CastleSide};
use crate::chess_move::Move;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;

use super::{GenMode, MoveList};

const PIECE_KINDS: [PieceKind; 5] =
    [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen, PieceKind::King];

pub(super) fn gen_pieces<M: GenMode>(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let occupied = pos.occupied();
    let enemies = pos.side(!us);
    let targets = if M::QUIETS { !pos.side(us) } else { enemies };

    for kind in PIECE_KINDS {
        for from in pos.pieces(kind, us) {
            for to in piece_attacks(kind, from, occupied) & targets {
                if enemies.contains(to) {
                    list.push(Move::capture(from, to));
                } else {
                    list.push(Move::quiet(from, to));
                }
            }
        }
    }

    if M::QUIETS {
        gen_castles(pos, list);
    }
}

fn gen_castles(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    for side in [CastleSide::King, CastleSide::Queen] {
        if !pos.castling().has(us, side) {
            continue;
        }
        let path = CastlePath::of(us, side);
        // Rights loaded from text may outlive the pieces they refer to.
        let in_place = pos.piece_on(path.king_from) == Some(Piece::new(PieceKind::King, us))
            && pos.piece_on(path.rook_from) == Some(Piece::new(PieceKind::Rook, us));
        if in_place && (pos.occupied() & path.must_be_empty).is_empty() {
            list.push(Move::castle(path.king_from, path.king_to));
        }
    }
}
