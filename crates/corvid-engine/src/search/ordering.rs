//! Move ordering: score every move once, then hand them out best first.

use corvid_core::{Move, MoveKind, MoveList, PieceKind, Position};

use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::see::see_ge;

/// MVV-LVA scores indexed `[victim][attacker]`: most valuable victim first,
/// then least valuable attacker.
const MVV_LVA: [[i32; PieceKind::COUNT]; PieceKind::COUNT] = {
    let weight = [1, 3, 3, 5, 9, 0];
    let mut table = [[0; PieceKind::COUNT]; PieceKind::COUNT];
    let mut victim = 0;
    while victim < PieceKind::COUNT {
        let mut attacker = 0;
        while attacker < PieceKind::COUNT {
            table[victim][attacker] = weight[victim] * 16 - weight[attacker];
            attacker += 1;
        }
        victim += 1;
    }
    table
};

const TT_MOVE: i32 = 1_000_000;
const GOOD_TACTICAL: i32 = 100_000;
const KILLER: [i32; 2] = [90_000, 89_000];
const BAD_CAPTURE: i32 = -100_000;

fn mvv_lva(pos: &Position, mv: Move) -> i32 {
    let victim = if mv.is_en_passant() {
        PieceKind::Pawn
    } else {
        pos.piece_on(mv.to()).map_or(PieceKind::Pawn, |p| p.kind)
    };
    let attacker = pos.piece_on(mv.from()).map_or(PieceKind::Pawn, |p| p.kind);
    MVV_LVA[victim.index()][attacker.index()]
}

/// Captures and queen promotions. Losing captures by SEE go below every quiet move.
fn tactical_score(pos: &Position, mv: Move) -> Option<i32> {
    let is_capture = mv.kind() == MoveKind::Capture || pos.piece_on(mv.to()).is_some();
    let is_queening = mv.promotion_piece() == Some(PieceKind::Queen);
    if !is_capture && !is_queening {
        return None;
    }
    let base = if is_capture { mvv_lva(pos, mv) } else { 0 };
    let bonus = if is_queening { 1_000 } else { 0 };
    if is_capture && !see_ge(pos, mv, 0) {
        Some(BAD_CAPTURE + base)
    } else {
        Some(GOOD_TACTICAL + base + bonus)
    }
}

/// Hands out the moves of a [`MoveList`] in descending score order by
/// selection sort, so a cutoff early on leaves the rest unsorted.
pub struct MovePicker {
    moves: MoveList,
    cursor: usize,
}

impl MovePicker {
    /// Full-width node: TT move, good captures and queen promotions, killers,
    /// quiets by history, losing captures.
    pub fn new(
        pos: &Position,
        mut moves: MoveList,
        tt_move: Option<Move>,
        killers: &KillerTable,
        history: &HistoryTable,
        ply: usize,
    ) -> MovePicker {
        let us = pos.side_to_move();
        for entry in moves.as_mut_slice() {
            let mv = entry.mv;
            entry.score = if Some(mv) == tt_move {
                TT_MOVE
            } else if let Some(score) = tactical_score(pos, mv) {
                score
            } else if let Some(rank) = killers.rank(ply, mv) {
                KILLER[rank]
            } else {
                history.score(us, mv)
            };
        }
        MovePicker { moves, cursor: 0 }
    }

    /// Quiescence node: only the tactical moves, by MVV-LVA.
    pub fn tactical(pos: &Position, mut moves: MoveList) -> MovePicker {
        for entry in moves.as_mut_slice() {
            entry.score = tactical_score(pos, entry.mv).unwrap_or(BAD_CAPTURE);
        }
        MovePicker { moves, cursor: 0 }
    }

    /// Score the next move carries; valid right after [`next`](Iterator::next).
    pub fn last_score(&self) -> i32 {
        self.moves.as_slice()[self.cursor - 1].score
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let remaining = &mut self.moves.as_mut_slice()[self.cursor..];
        let best = remaining
            .iter()
            .enumerate()
            .max_by_key(|(_, entry)| entry.score)
            .map(|(i, _)| i)?;
        remaining.swap(0, best);
        self.cursor += 1;
        Some(remaining[0].mv)
    }
}

#[cfg(test)]
mod tests {
    use corvid_core::{Move, MoveList, Position, Square, generate_moves};

    use super::MovePicker;
    use crate::search::heuristics::{HistoryTable, KillerTable};

    fn moves_of(pos: &Position) -> MoveList {
        let mut list = MoveList::new();
        generate_moves(pos, &mut list);
        list
    }

    #[test]
    fn yields_every_move_once() {
        let pos: Position =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".parse().unwrap();
        let list = moves_of(&pos);
        let picked: Vec<Move> =
            MovePicker::new(&pos, moves_of(&pos), None, &KillerTable::new(), &HistoryTable::new(), 0).collect();
        assert_eq!(picked.len(), list.len());
        assert!(list.iter().all(|mv| picked.contains(&mv)));
    }

    #[test]
    fn tt_move_then_captures_then_killers() {
        // White can take the hanging queen on d5 with the pawn or the knight.
        let pos: Position = "4k3/8/8/3q4/4P3/2N5/8/4K3 w - - 0 1".parse().unwrap();
        let tt_move = Move::quiet(Square::E1, Square::F2);
        let killer = Move::quiet(Square::C3, Square::B5);
        let mut killers = KillerTable::new();
        killers.store(2, killer);

        let mut picker = MovePicker::new(&pos, moves_of(&pos), Some(tt_move), &killers, &HistoryTable::new(), 2);
        assert_eq!(picker.next(), Some(tt_move));
        assert_eq!(picker.next(), Some(Move::capture(Square::E4, Square::D5)));
        assert_eq!(picker.next(), Some(Move::capture(Square::C3, Square::D5)));
        assert_eq!(picker.next(), Some(killer));
    }

    #[test]
    fn losing_capture_goes_last() {
        // Qxd6 loses the queen to the c7 pawn.
        let pos: Position = "4k3/2p5/3p4/8/8/8/3Q4/4K3 w - - 0 1".parse().unwrap();
        let picker = MovePicker::new(&pos, moves_of(&pos), None, &KillerTable::new(), &HistoryTable::new(), 0);
        assert_eq!(picker.last(), Some(Move::capture(Square::D2, Square::D6)));
    }
}
