//! Transposition table: search results cached by position hash.
//!
//! A [`SizedCache`] of [`TtEntry`] slots with always-overwrite replacement.
//! The table is owned by one search at a time, so slots are plain values.

use corvid_core::{CacheEntry, CacheError, Move, SizedCache};

use crate::search::negamax::MATE_THRESHOLD;

/// How the stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search finished inside the window.
    Exact,
    /// Failed high: the true score is at least this.
    Lower,
    /// Failed low: the true score is at most this.
    Upper,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtEntry {
    key: u64,
    best_move: Move,
    score: i16,
    depth: u8,
    /// `None` marks an empty slot.
    bound: Option<Bound>,
}

impl CacheEntry for TtEntry {
    #[inline]
    fn key(&self) -> u64 {
        self.key
    }
}

/// What a probe yields: a score that can cut the node, and a move to try first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtProbe {
    pub usable_score: Option<i32>,
    pub best_move: Option<Move>,
}

/// Mate scores are stored relative to the node, not the root.
#[inline]
pub fn score_to_tt(score: i32, ply: usize) -> i16 {
    let ply = ply as i32;
    let adjusted = if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    };
    adjusted as i16
}

/// Inverse of [`score_to_tt`] for a node at `ply`.
#[inline]
pub fn score_from_tt(score: i16, ply: usize) -> i32 {
    let (score, ply) = (score as i32, ply as i32);
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

pub struct TranspositionTable {
    slots: SizedCache<TtEntry>,
}

impl TranspositionTable {
    pub fn new(megabytes: usize) -> Result<TranspositionTable, CacheError> {
        Ok(TranspositionTable { slots: SizedCache::new(megabytes)? })
    }

    pub fn resize(&mut self, megabytes: usize) -> Result<(), CacheError> {
        self.slots.resize(megabytes)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn hashfull(&self) -> u32 {
        self.slots.hashfull()
    }

    /// Look up `hash` for a node searched to `depth` with window `(alpha, beta)`.
    ///
    /// The stored move is returned whenever the key matches; the score only
    /// when the entry is deep enough and its bound decides the window.
    pub fn probe(&self, hash: u64, depth: u8, alpha: i32, beta: i32, ply: usize) -> TtProbe {
        let Some(entry) = self.slots.get(hash, hash) else {
            return TtProbe::default();
        };
        let Some(bound) = entry.bound else {
            return TtProbe::default();
        };

        let best_move = (!entry.best_move.is_null()).then_some(entry.best_move);
        let score = score_from_tt(entry.score, ply);
        let usable = entry.depth >= depth
            && match bound {
                Bound::Exact => true,
                Bound::Lower => score >= beta,
                Bound::Upper => score <= alpha,
            };

        TtProbe { usable_score: usable.then_some(score), best_move }
    }

    pub fn store(&mut self, hash: u64, best_move: Move, score: i32, depth: u8, bound: Bound, ply: usize) {
        let entry = TtEntry { key: hash, best_move, score: score_to_tt(score, ply), depth, bound: Some(bound) };
        self.slots.store(hash, entry);
    }
}
