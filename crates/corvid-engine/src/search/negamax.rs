//! Principal-variation search with quiescence.

use corvid_core::{Color, Move, MoveKind, MoveList, Position, generate_captures, generate_moves};

use crate::eval::Evaluator;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MovePicker;
use crate::search::tt::{Bound, TranspositionTable};

/// Bound outside every reachable score.
pub const INF: i32 = 30_000;

/// Score of delivering mate at the root; mate at ply `n` scores `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 29_000;

/// Scores beyond this are forced mates.
pub const MATE_THRESHOLD: i32 = 28_000;

/// Deepest ply the search descends to, extensions included.
pub const MAX_PLY: usize = 128;

/// Depth reduction of the null-move search.
const NULL_MOVE_REDUCTION: u8 = 2;

/// Triangular table of principal variations: row `ply` holds the best line
/// found from that ply on.
pub struct PvTable {
    lines: Box<[[Move; MAX_PLY]; MAX_PLY]>,
    len: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> PvTable {
        PvTable { lines: Box::new([[Move::NULL; MAX_PLY]; MAX_PLY]), len: [0; MAX_PLY] }
    }

    #[inline]
    fn clear_ply(&mut self, ply: usize) {
        self.len[ply] = 0;
    }

    /// Line at `ply` becomes `mv` followed by the line at `ply + 1`.
    fn update(&mut self, ply: usize, mv: Move) {
        let tail = if ply + 1 < MAX_PLY { self.len[ply + 1].min(MAX_PLY - 1) } else { 0 };
        let (upper, lower) = self.lines.split_at_mut(ply + 1);
        let line = &mut upper[ply];
        line[0] = mv;
        if tail > 0 {
            line[1..=tail].copy_from_slice(&lower[0][..tail]);
        }
        self.len[ply] = tail + 1;
    }

    pub fn root(&self) -> &[Move] {
        &self.lines[0][..self.len[0]]
    }
}

impl Default for PvTable {
    fn default() -> PvTable {
        PvTable::new()
    }
}

/// Everything one search threads through the recursion.
pub(super) struct SearchContext<'a, E: Evaluator> {
    pub nodes: u64,
    pub pv: PvTable,
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub control: &'a SearchControl,
    pub evaluator: &'a E,
    /// Game ply of the root; earlier positions belong to the game record.
    pub root_ply: usize,
    pub root_color: Color,
    pub contempt: i32,
    /// Best root move of the pass in progress, kept for aborted passes.
    pub root_best: Move,
}

impl<E: Evaluator> SearchContext<'_, E> {
    /// A draw costs the root side `contempt`, so it is worth that much to the opponent.
    #[inline]
    fn draw_score(&self, pos: &Position) -> i32 {
        if pos.side_to_move() == self.root_color { -self.contempt } else { self.contempt }
    }

    #[inline]
    fn evaluate(&self, pos: &Position) -> i32 {
        self.evaluator.evaluate(pos)
    }

    #[inline]
    fn aborted(&self) -> bool {
        self.control.is_stopped()
    }
}

/// Search `pos` to `depth` plies within `(alpha, beta)`.
///
/// Returns 0 without meaning once the search has been stopped; callers must
/// check before trusting the result.
pub(super) fn negamax<E: Evaluator>(
    pos: &mut Position,
    depth: u8,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    null_allowed: bool,
    ctx: &mut SearchContext<'_, E>,
) -> i32 {
    ctx.pv.clear_ply(ply);
    ctx.nodes += 1;
    if ctx.control.should_stop(ctx.nodes) {
        return 0;
    }

    let root = ply == 0;
    if !root && pos.is_fifty_move_draw() {
        // Mate on the hundredth ply still counts.
        if pos.in_check() && !pos.has_legal_move() {
            return -(MATE_SCORE - ply as i32);
        }
        return ctx.draw_score(pos);
    }
    if !root && pos.is_repetition(ctx.root_ply) {
        return ctx.draw_score(pos);
    }
    if ply >= MAX_PLY - 1 {
        return ctx.evaluate(pos);
    }

    let in_check = pos.in_check();
    let depth = if in_check { depth.saturating_add(1) } else { depth };
    if depth == 0 {
        return qsearch(pos, ply, alpha, beta, ctx);
    }

    let probe = ctx.tt.probe(pos.hash(), depth, alpha, beta, ply);
    if !root && let Some(score) = probe.usable_score {
        return score;
    }

    let is_pv = beta - alpha > 1;
    let us = pos.side_to_move();

    if null_allowed
        && !is_pv
        && !in_check
        && depth > NULL_MOVE_REDUCTION
        && pos.has_non_pawn_material(us)
        && ctx.evaluate(pos) >= beta
    {
        pos.make_null_move();
        let score = -negamax(pos, depth - 1 - NULL_MOVE_REDUCTION, ply + 1, -beta, -beta + 1, false, ctx);
        pos.unmake_null_move();
        if ctx.aborted() {
            return 0;
        }
        if score >= beta {
            // Unproven mates from a skipped move are not trusted.
            return if score > MATE_THRESHOLD { beta } else { score };
        }
    }

    let mut moves = MoveList::new();
    generate_moves(pos, &mut moves);
    let picker = MovePicker::new(pos, moves, probe.best_move, ctx.killers, ctx.history, ply);

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = Move::NULL;
    let mut legal = 0;

    for mv in picker {
        let quiet = matches!(mv.kind(), MoveKind::Quiet | MoveKind::Castle);
        if !pos.make_move(mv) {
            pos.unmake_move(mv);
            continue;
        }
        legal += 1;

        let score = if legal == 1 {
            -negamax(pos, depth - 1, ply + 1, -beta, -alpha, true, ctx)
        } else {
            let reduce = depth >= 3 && legal > 3 && quiet && !in_check && !pos.in_check();
            let reduced_depth = if reduce { depth - 2 } else { depth - 1 };
            let mut score = -negamax(pos, reduced_depth, ply + 1, -alpha - 1, -alpha, true, ctx);
            if reduce && score > alpha && !ctx.aborted() {
                score = -negamax(pos, depth - 1, ply + 1, -alpha - 1, -alpha, true, ctx);
            }
            if score > alpha && score < beta && !ctx.aborted() {
                score = -negamax(pos, depth - 1, ply + 1, -beta, -alpha, true, ctx);
            }
            score
        };
        pos.unmake_move(mv);

        if ctx.aborted() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
            if score > alpha {
                alpha = score;
                ctx.pv.update(ply, mv);
                if root {
                    ctx.root_best = mv;
                }
            }
        }
        if alpha >= beta {
            if quiet {
                ctx.killers.store(ply, mv);
                ctx.history.reward(us, mv, depth);
            }
            break;
        }
    }

    if legal == 0 {
        return if in_check { -(MATE_SCORE - ply as i32) } else { ctx.draw_score(pos) };
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if best_score > original_alpha {
        Bound::Exact
    } else {
        Bound::Upper
    };
    ctx.tt.store(pos.hash(), best_move, best_score, depth, bound, ply);
    best_score
}

/// Resolve captures until the position is quiet, standing pat on the static eval.
/// Fails hard: a cutoff returns `beta` itself.
fn qsearch<E: Evaluator>(
    pos: &mut Position,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_, E>,
) -> i32 {
    ctx.pv.clear_ply(ply);
    ctx.nodes += 1;
    if ctx.control.should_stop(ctx.nodes) {
        return 0;
    }

    let stand_pat = ctx.evaluate(pos);
    if ply >= MAX_PLY - 1 {
        return stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }
    alpha = alpha.max(stand_pat);

    let mut moves = MoveList::new();
    generate_captures(pos, &mut moves);
    let mut picker = MovePicker::tactical(pos, moves);

    while let Some(mv) = picker.next() {
        // Losing captures sort last; none of them are worth trying.
        if picker.last_score() < 0 {
            break;
        }
        if !pos.make_move(mv) {
            pos.unmake_move(mv);
            continue;
        }
        let score = -qsearch(pos, ply + 1, -beta, -alpha, ctx);
        pos.unmake_move(mv);

        if ctx.aborted() {
            return 0;
        }
        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }
    alpha
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use corvid_core::{Move, Position, Square};

    use super::{INF, PvTable, SearchContext, qsearch};
    use crate::eval::MaterialPst;
    use crate::search::control::SearchControl;
    use crate::search::heuristics::{HistoryTable, KillerTable};
    use crate::search::tt::TranspositionTable;

    /// Quiescence score of `fen` in the window `(alpha, beta)`.
    fn quiesce(fen: &str, alpha: i32, beta: i32) -> i32 {
        let mut pos: Position = fen.parse().unwrap();
        let mut tt = TranspositionTable::new(1).unwrap();
        let mut killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut ctx = SearchContext {
            nodes: 0,
            pv: PvTable::new(),
            tt: &mut tt,
            killers: &mut killers,
            history: &mut history,
            control: &control,
            evaluator: &MaterialPst,
            root_ply: 0,
            root_color: pos.side_to_move(),
            contempt: 0,
            root_best: Move::NULL,
        };
        qsearch(&mut pos, 0, alpha, beta, &mut ctx)
    }

    #[test]
    fn quiescence_fails_hard() {
        // Stand pat at 0 already beats the window.
        let startpos = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(quiesce(startpos, -100, -50), -50);

        // Standing pat loses a queen; exd5 wins it back and cuts off.
        let hanging = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1";
        assert_eq!(quiesce(hanging, -100, 0), 0);
        assert!(quiesce(hanging, -INF, INF) > 0);
    }

    #[test]
    fn pv_table_collects_child_lines() {
        let mut pv = PvTable::new();
        let a = Move::quiet(Square::E2, Square::E4);
        let b = Move::quiet(Square::E7, Square::E5);
        let c = Move::quiet(Square::G1, Square::F3);

        pv.clear_ply(2);
        pv.update(2, c);
        pv.update(1, b);
        pv.update(0, a);
        assert_eq!(pv.root(), &[a, b, c]);

        // A new best move at ply 0 whose child line is empty.
        pv.clear_ply(1);
        pv.update(0, b);
        assert_eq!(pv.root(), &[b]);
    }
}
