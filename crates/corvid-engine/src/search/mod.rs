//! Iterative deepening driver and the search state it tracks.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod tt;

use std::time::Duration;

use corvid_core::{CacheError, Move, Position};
use tracing::debug;

use crate::eval::{Evaluator, MaterialPst};
use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, PvTable, SearchContext, negamax};
use tt::TranspositionTable;

/// Where the searcher is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    /// Running the pass for `depth`.
    Searching { depth: u8 },
    /// The last search ended, by limit or by request.
    Stopped,
}

/// Outcome of a search: the deepest completed pass, or the partial best
/// move when no pass completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `Move::NULL` only when the root has no legal move.
    pub best_move: Move,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// Progress after each completed depth.
#[derive(Debug, Clone)]
pub struct SearchInfo {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

/// Plies to mate for a mate score, negative when the side to move is mated.
pub fn mate_distance(score: i32) -> Option<i32> {
    if score > MATE_THRESHOLD {
        Some(MATE_SCORE - score)
    } else if score < -MATE_THRESHOLD {
        Some(-(MATE_SCORE + score))
    } else {
        None
    }
}

/// Iterative-deepening searcher. Owns the tables that persist between
/// searches of one game.
pub struct Searcher<E: Evaluator = MaterialPst> {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    evaluator: E,
    contempt: i32,
    state: SearchState,
}

impl Searcher<MaterialPst> {
    pub fn new(hash_mb: usize) -> Result<Searcher<MaterialPst>, CacheError> {
        Searcher::with_evaluator(hash_mb, MaterialPst)
    }
}

impl<E: Evaluator> Searcher<E> {
    pub fn with_evaluator(hash_mb: usize, evaluator: E) -> Result<Searcher<E>, CacheError> {
        Ok(Searcher {
            tt: TranspositionTable::new(hash_mb)?,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            evaluator,
            contempt: 0,
            state: SearchState::Idle,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn set_contempt(&mut self, contempt: i32) {
        self.contempt = contempt;
    }

    /// Reallocate the transposition table; the old entries are lost.
    pub fn resize_tt(&mut self, hash_mb: usize) -> Result<(), CacheError> {
        self.tt.resize(hash_mb)
    }

    /// Forget everything learned: transposition table, killers and history.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
        self.state = SearchState::Idle;
    }

    /// Search `pos` by iterative deepening up to `max_depth`.
    ///
    /// A pass interrupted by `control` is discarded. `on_depth` hears about
    /// every completed pass. `pos` is left as it was given.
    pub fn search<F>(
        &mut self,
        pos: &mut Position,
        max_depth: u8,
        control: &SearchControl,
        mut on_depth: F,
    ) -> SearchResult
    where
        F: FnMut(&SearchInfo),
    {
        let max_depth = max_depth.clamp(1, (MAX_PLY / 2) as u8);
        debug!(fen = %pos, max_depth, "search started");

        self.history.age();
        let fallback = pos.legal_moves().iter().next().unwrap_or(Move::NULL);
        let mut ctx = SearchContext {
            nodes: 0,
            pv: PvTable::new(),
            tt: &mut self.tt,
            killers: &mut self.killers,
            history: &mut self.history,
            control,
            evaluator: &self.evaluator,
            root_ply: pos.ply(),
            root_color: pos.side_to_move(),
            contempt: self.contempt,
            root_best: Move::NULL,
        };

        let mut result =
            SearchResult { best_move: Move::NULL, score: -INF, depth: 0, nodes: 0, pv: Vec::new() };

        for depth in 1..=max_depth {
            if !control.should_start_iteration() {
                break;
            }
            self.state = SearchState::Searching { depth };
            ctx.root_best = Move::NULL;

            let score = negamax(pos, depth, 0, -INF, INF, false, &mut ctx);
            if control.is_stopped() {
                debug!(depth, nodes = ctx.nodes, "pass aborted");
                if result.depth == 0 && !ctx.root_best.is_null() {
                    result.best_move = ctx.root_best;
                }
                break;
            }

            let pv = ctx.pv.root().to_vec();
            result = SearchResult {
                best_move: pv.first().copied().unwrap_or(Move::NULL),
                score,
                depth,
                nodes: ctx.nodes,
                pv,
            };

            let info = SearchInfo {
                depth,
                score,
                nodes: ctx.nodes,
                elapsed: control.elapsed(),
                hashfull: ctx.tt.hashfull(),
                pv: result.pv.clone(),
            };
            debug!(depth, score, nodes = ctx.nodes, elapsed_ms = info.elapsed.as_millis() as u64, "pass complete");
            on_depth(&info);

            // Nothing left to learn once every line is mate or there is no move.
            if result.best_move.is_null() || mate_distance(score).is_some_and(|plies| plies.abs() <= depth as i32) {
                break;
            }
        }

        result.nodes = ctx.nodes;
        if result.best_move.is_null() {
            result.best_move = fallback;
        }
        self.state = SearchState::Stopped;
        debug!(best_move = %result.best_move, score = result.score, depth = result.depth, nodes = result.nodes, "search finished");
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use corvid_core::{Move, Position, Square};

    use super::control::SearchControl;
    use super::negamax::MATE_THRESHOLD;
    use super::*;

    fn infinite() -> SearchControl {
        SearchControl::new_infinite(Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn mate_distance_both_ways() {
        assert_eq!(mate_distance(MATE_SCORE - 1), Some(1));
        assert_eq!(mate_distance(-(MATE_SCORE - 2)), Some(-2));
        assert_eq!(mate_distance(150), None);
    }

    #[test]
    fn finds_scholars_mate() {
        let mut pos: Position =
            "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4".parse().unwrap();
        let mut searcher = Searcher::new(1).unwrap();
        let result = searcher.search(&mut pos, 3, &infinite(), |_| {});
        assert_eq!(result.best_move, Move::capture(Square::H5, Square::F7));
        assert!(result.score > MATE_THRESHOLD);
        assert_eq!(searcher.state(), SearchState::Stopped);
    }

    #[test]
    fn stalemate_scores_zero_with_no_move() {
        let mut pos: Position = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let result = Searcher::new(1).unwrap().search(&mut pos, 4, &infinite(), |_| {});
        assert_eq!(result.best_move, Move::NULL);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn checkmated_root_scores_mate() {
        let mut pos: Position = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let result = Searcher::new(1).unwrap().search(&mut pos, 4, &infinite(), |_| {});
        assert_eq!(result.best_move, Move::NULL);
        assert_eq!(result.score, -MATE_SCORE);
    }

    #[test]
    fn reports_each_depth_and_restores_position() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        let mut depths = Vec::new();
        let result = Searcher::new(1).unwrap().search(&mut pos, 4, &infinite(), |info| depths.push(info.depth));
        assert_eq!(depths, vec![1, 2, 3, 4]);
        assert_eq!(result.depth, 4);
        assert!(!result.best_move.is_null());
        assert_eq!(result.pv.first(), Some(&result.best_move));
        assert_eq!(pos, before);
    }

    #[test]
    fn stopped_before_the_first_pass_still_returns_a_move() {
        let stop = Arc::new(AtomicBool::new(true));
        let control = SearchControl::new_infinite(stop);
        let mut pos = Position::startpos();
        let result = Searcher::new(1).unwrap().search(&mut pos, 10, &control, |_| {});
        assert_eq!(result.depth, 0);
        assert!(pos.clone().legal_moves().contains(result.best_move));
    }

    #[test]
    fn wins_the_hanging_queen() {
        let mut pos: Position = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let result = Searcher::new(1).unwrap().search(&mut pos, 4, &infinite(), |_| {});
        assert_eq!(result.best_move, Move::capture(Square::E4, Square::D5));
    }
}
