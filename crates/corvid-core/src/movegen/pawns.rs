use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::{Move, PROMOTION_KINDS};
use crate::color::Color;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::{GenMode, MoveList};

fn push_promotions<M: GenMode>(list: &mut MoveList, from: Square, to: Square) {
    if M::QUIETS {
        for kind in PROMOTION_KINDS {
            list.push(Move::promotion(from, to, kind));
        }
    } else {
        list.push(Move::promotion(from, to, PieceKind::Queen));
    }
}

pub(super) fn gen_pawns<M: GenMode>(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let them = !us;
    let pawns = pos.pieces(PieceKind::Pawn, us);
    let enemies = pos.side(them);
    let empty = !pos.occupied();
    let up = us.forward();

    let (last_rank, double_rank) = match us {
        Color::White => (Bitboard::RANK_8, Bitboard::rank(3)),
        Color::Black => (Bitboard::RANK_1, Bitboard::rank(4)),
    };
    let advance = |bb: Bitboard| match us {
        Color::White => bb.north(),
        Color::Black => bb.south(),
    };

    let single = advance(pawns) & empty;
    for to in single & last_rank {
        push_promotions::<M>(list, to.offset(-up), to);
    }
    if M::QUIETS {
        for to in single & !last_rank {
            list.push(Move::quiet(to.offset(-up), to));
        }
        for to in advance(single) & empty & double_rank {
            list.push(Move::quiet(to.offset(-2 * up), to));
        }
    }

    for from in pawns {
        let targets = pawn_attacks(us, from) & enemies;
        for to in targets & last_rank {
            push_promotions::<M>(list, from, to);
        }
        for to in targets & !last_rank {
            list.push(Move::capture(from, to));
        }
    }

    if let Some(ep) = pos.en_passant() {
        for from in pawn_attacks(them, ep) & pawns {
            list.push(Move::en_passant(from, ep));
        }
    }
}
