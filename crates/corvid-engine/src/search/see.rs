//! Static exchange evaluation.
//!
//! Plays out the captures on one square, each side always recapturing with its
//! least valuable attacker, and folds the gains back so either side may stop
//! when continuing would lose material.

use corvid_core::attacks::{bishop_attacks, rook_attacks};
use corvid_core::{Move, PieceKind, Position};

/// Exchange values indexed by [`PieceKind::index`].
pub const SEE_VALUE: [i32; PieceKind::COUNT] = [100, 300, 300, 500, 900, 5_000];

/// Net material won by `mv` for the side to move. Non-captures score the
/// exchange that follows the piece landing on an empty square.
pub fn see(pos: &Position, mv: Move) -> i32 {
    let (from, to) = (mv.from(), mv.to());
    let us = pos.side_to_move();

    let mut occupied = pos.occupied() ^ from.bitboard();
    let first_victim = if mv.is_en_passant() {
        occupied ^= to.offset(-us.forward()).bitboard();
        SEE_VALUE[PieceKind::Pawn.index()]
    } else {
        pos.piece_on(to).map_or(0, |p| SEE_VALUE[p.kind.index()])
    };

    let diagonal = pos.kind_bb(PieceKind::Bishop) | pos.kind_bb(PieceKind::Queen);
    let straight = pos.kind_bb(PieceKind::Rook) | pos.kind_bb(PieceKind::Queen);

    let mut gain = [0i32; 32];
    gain[0] = first_victim;
    let mut depth = 0;
    let mut on_square = pos.piece_on(from).map_or(0, |p| SEE_VALUE[p.kind.index()]);
    let mut attackers = pos.attackers_to(to, occupied) & occupied;
    let mut side = !us;

    while depth + 1 < gain.len() {
        let ours = attackers & pos.side(side);
        let Some((sq, kind)) = PieceKind::ALL
            .iter()
            .find_map(|&kind| (ours & pos.kind_bb(kind)).lsb().map(|sq| (sq, kind)))
        else {
            break;
        };

        depth += 1;
        gain[depth] = on_square - gain[depth - 1];
        on_square = SEE_VALUE[kind.index()];

        occupied ^= sq.bitboard();
        // Removing a piece may uncover a slider behind it.
        attackers |= (bishop_attacks(to, occupied) & diagonal) | (rook_attacks(to, occupied) & straight);
        attackers &= occupied;
        side = !side;
    }

    while depth > 0 {
        depth -= 1;
        gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
    }
    gain[0]
}

/// Whether `mv` wins at least `threshold` centipawns in the exchange.
#[inline]
pub fn see_ge(pos: &Position, mv: Move, threshold: i32) -> bool {
    see(pos, mv) >= threshold
}
