//! Killer moves and the butterfly history table for quiet-move ordering.

use corvid_core::{Color, Move};

use crate::search::negamax::MAX_PLY;

/// Two quiet moves per ply that recently caused a beta cutoff.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> KillerTable {
        KillerTable { slots: [[Move::NULL; 2]; MAX_PLY] }
    }

    /// Newest killer goes first; the old first slot moves down.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    /// 0 for the primary killer, 1 for the secondary.
    pub fn rank(&self, ply: usize, mv: Move) -> Option<usize> {
        let slot = self.slots.get(ply)?;
        slot.iter().position(|&killer| killer == mv && !mv.is_null())
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> KillerTable {
        KillerTable::new()
    }
}

/// Scores stay below this; reaching it halves the whole table.
pub const HISTORY_MAX: i32 = 1 << 14;

/// Cutoff counts for quiet moves, indexed `[color][from][to]`.
pub struct HistoryTable {
    table: Box<[[[i32; 64]; 64]; Color::COUNT]>,
}

impl HistoryTable {
    pub fn new() -> HistoryTable {
        HistoryTable { table: Box::new([[[0; 64]; 64]; Color::COUNT]) }
    }

    /// Reward a quiet move that failed high at `depth`.
    pub fn reward(&mut self, color: Color, mv: Move, depth: u8) {
        let bonus = depth as i32 * depth as i32;
        let entry = &mut self.table[color.index()][mv.from().index()][mv.to().index()];
        *entry += bonus;
        if *entry >= HISTORY_MAX {
            self.age();
        }
    }

    #[inline]
    pub fn score(&self, color: Color, mv: Move) -> i32 {
        self.table[color.index()][mv.from().index()][mv.to().index()]
    }

    /// Halve every entry, keeping the relative order.
    pub fn age(&mut self) {
        for entry in self.table.iter_mut().flatten().flatten() {
            *entry /= 2;
        }
    }

    pub fn clear(&mut self) {
        for entry in self.table.iter_mut().flatten().flatten() {
            *entry = 0;
        }
    }
}

impl Default for HistoryTable {
    fn default() -> HistoryTable {
        HistoryTable::new()
    }
}

#[cfg(test)]
mod tests {
    use corvid_core::{Color, Move, Square};

    use super::{HISTORY_MAX, HistoryTable, KillerTable};

    #[test]
    fn killers_shift_down() {
        let e4 = Move::quiet(Square::E2, Square::E4);
        let d4 = Move::quiet(Square::D2, Square::D4);
        let mut killers = KillerTable::new();

        killers.store(3, e4);
        assert_eq!(killers.rank(3, e4), Some(0));
        killers.store(3, d4);
        assert_eq!(killers.rank(3, d4), Some(0));
        assert_eq!(killers.rank(3, e4), Some(1));

        // Storing the current first killer again is a no-op.
        killers.store(3, d4);
        assert_eq!(killers.rank(3, e4), Some(1));
        assert_eq!(killers.rank(4, e4), None);
    }

    #[test]
    fn null_is_never_a_killer() {
        let killers = KillerTable::new();
        assert_eq!(killers.rank(0, Move::NULL), None);
        assert_eq!(killers.rank(10_000, Move::NULL), None);
    }

    #[test]
    fn history_rewards_and_ages() {
        let mv = Move::quiet(Square::G1, Square::F3);
        let mut history = HistoryTable::new();
        history.reward(Color::White, mv, 4);
        assert_eq!(history.score(Color::White, mv), 16);
        assert_eq!(history.score(Color::Black, mv), 0);

        for _ in 0..1_000 {
            history.reward(Color::White, mv, 20);
        }
        assert!(history.score(Color::White, mv) < HISTORY_MAX);

        history.clear();
        assert_eq!(history.score(Color::White, mv), 0);
    }
}
