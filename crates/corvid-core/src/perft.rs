//! Perft: leaf-node counts used to verify move generation.

use crate::cache::{CacheEntry, SizedCache};
use crate::chess_move::Move;
use crate::movegen::{MoveList, generate_moves};
use crate::position::Position;

/// Count the leaf nodes `depth` plies below `pos`.
///
/// Depth 0 is the position itself. At depth 1 legal moves are counted
/// without recursing further.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_moves(pos, &mut moves);

    let mut nodes = 0;
    for mv in moves.iter() {
        if pos.make_move(mv) {
            nodes += if depth == 1 { 1 } else { perft(pos, depth - 1) };
        }
        pos.unmake_move(mv);
    }
    nodes
}

/// Per-root-move breakdown, sorted by move text.
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let mut results: Vec<(Move, u64)> = pos
        .legal_moves()
        .iter()
        .map(|mv| {
            pos.make_move(mv);
            let count = perft(pos, depth.saturating_sub(1));
            pos.unmake_move(mv);
            (mv, count)
        })
        .collect();
    results.sort_by_key(|(mv, _)| mv.to_string());
    results
}

/// Cached subtree count, keyed by position hash and remaining depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftEntry {
    key: u64,
    nodes: u64,
}

impl PerftEntry {
    /// Mixes the depth into the key so counts at different depths never alias.
    #[inline]
    fn key_for(hash: u64, depth: u32) -> u64 {
        hash ^ (depth as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

impl CacheEntry for PerftEntry {
    #[inline]
    fn key(&self) -> u64 {
        self.key
    }
}

/// [`perft`] with subtree counts memoized in `cache`.
pub fn perft_cached(pos: &mut Position, depth: u32, cache: &mut SizedCache<PerftEntry>) -> u64 {
    if depth <= 1 {
        return perft(pos, depth);
    }

    let key = PerftEntry::key_for(pos.hash(), depth);
    if let Some(entry) = cache.get(key, key) {
        return entry.nodes;
    }

    let mut moves = MoveList::new();
    generate_moves(pos, &mut moves);

    let mut nodes = 0;
    for mv in moves.iter() {
        if pos.make_move(mv) {
            nodes += perft_cached(pos, depth - 1, cache);
        }
        pos.unmake_move(mv);
    }
    cache.store(key, PerftEntry { key, nodes });
    nodes
}
