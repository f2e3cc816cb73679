//! Magic bitboard tables for rook and bishop attacks.
//!
//! Every relevant-occupancy subset of a square is hashed with
//! `((occupied & mask) * magic) >> shift` into that square's slice of a dense
//! table. A multiplier is accepted only if no two subsets with different
//! attack sets land on the same slot; that check happens while the table is
//! built, so lookups never verify anything.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::bitboard::Bitboard;
use crate::square::Square;

use super::magic_data::{BISHOP_MAGICS, ROOK_MAGICS};

/// The two ray-moving piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Rook => [(1, 0), (-1, 0), (0, 1), (0, -1)],
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
        }
    }
}

#[inline]
fn on_board(file: i8, rank: i8) -> bool {
    (0..8).contains(&file) && (0..8).contains(&rank)
}

/// Attack set found by marching each ray until it leaves the board or
/// reaches a blocker. The blocker square itself is attacked.
pub fn ray_attacks(slider: Slider, sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for (df, dr) in slider.directions() {
        let (mut f, mut r) = (sq.file() as i8 + df, sq.rank() as i8 + dr);
        while on_board(f, r) {
            let target = Square::from_coords(f as u8, r as u8);
            attacks |= target.bitboard();
            if occupied.contains(target) {
                break;
            }
            f += df;
            r += dr;
        }
    }
    attacks
}

/// Squares whose occupancy can change the attack set: each ray without its
/// last square, since a piece on the edge blocks nothing further.
pub fn relevant_mask(slider: Slider, sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for (df, dr) in slider.directions() {
        let (mut f, mut r) = (sq.file() as i8 + df, sq.rank() as i8 + dr);
        while on_board(f + df, r + dr) {
            mask |= Square::from_coords(f as u8, r as u8).bitboard();
            f += df;
            r += dr;
        }
    }
    mask
}

#[derive(Debug, Clone, Copy)]
struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl MagicEntry {
    const UNSET: MagicEntry = MagicEntry { mask: Bitboard::EMPTY, magic: 0, shift: 64, offset: 0 };

    #[inline(always)]
    fn index(&self, occupied: Bitboard) -> usize {
        self.offset + ((occupied & self.mask) * self.magic >> self.shift) as usize
    }
}

/// Hash every subset of `mask` into `slots` (which must start out empty).
///
/// Returns `false` on a destructive collision: two subsets sharing a slot
/// but not an attack set. Slider attack sets are never empty, so
/// `Bitboard::EMPTY` marks an unused slot.
fn fill(slider: Slider, sq: Square, mask: Bitboard, magic: u64, slots: &mut [Bitboard]) -> bool {
    let shift = 64 - mask.count();
    let mut subset = Bitboard::EMPTY;
    loop {
        let attacks = ray_attacks(slider, sq, subset);
        let slot = &mut slots[(subset * magic >> shift) as usize];
        if slot.is_empty() {
            *slot = attacks;
        } else if *slot != attacks {
            return false;
        }
        // Carry-rippler: next subset of the mask.
        subset = Bitboard::new(subset.bits().wrapping_sub(mask.bits())) & mask;
        if subset.is_empty() {
            return true;
        }
    }
}

/// Search for a working multiplier for `sq` by trying sparse random numbers.
pub fn find_magic<R: Rng + ?Sized>(slider: Slider, sq: Square, rng: &mut R) -> u64 {
    let mask = relevant_mask(slider, sq);
    let mut slots = vec![Bitboard::EMPTY; 1 << mask.count()];
    loop {
        let candidate = rng.random::<u64>() & rng.random::<u64>() & rng.random::<u64>();
        // Too few mask bits reaching the top byte almost never hashes well.
        if (mask * candidate & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        slots.fill(Bitboard::EMPTY);
        if fill(slider, sq, mask, candidate, &mut slots) {
            return candidate;
        }
    }
}

struct SliderTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    fn build(slider: Slider, known: &[u64; 64]) -> SliderTable {
        let mut rng = StdRng::seed_from_u64(0x6d61_6769_6373);
        let mut entries = [MagicEntry::UNSET; 64];
        let mut attacks = Vec::new();

        for sq in Square::all() {
            let mask = relevant_mask(slider, sq);
            let offset = attacks.len();
            attacks.resize(offset + (1 << mask.count()), Bitboard::EMPTY);
            let slots = &mut attacks[offset..];

            let mut magic = known[sq.index()];
            if !fill(slider, sq, mask, magic, slots) {
                debug!(square = %sq, ?slider, "known magic collides, searching for a replacement");
                magic = find_magic(slider, sq, &mut rng);
                slots.fill(Bitboard::EMPTY);
                let filled = fill(slider, sq, mask, magic, slots);
                debug_assert!(filled);
            }

            entries[sq.index()] = MagicEntry { mask, magic, shift: 64 - mask.count(), offset };
        }

        SliderTable { entries, attacks }
    }

    #[inline(always)]
    fn lookup(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.attacks[self.entries[sq.index()].index(occupied)]
    }
}

struct Tables {
    rook: SliderTable,
    bishop: SliderTable,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| Tables {
        rook: SliderTable::build(Slider::Rook, &ROOK_MAGICS),
        bishop: SliderTable::build(Slider::Bishop, &BISHOP_MAGICS),
    })
}

/// Force table construction, e.g. before the first timed search.
pub fn init() {
    tables();
}

#[inline]
pub(crate) fn rook_lookup(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().rook.lookup(sq, occupied)
}

#[inline]
pub(crate) fn bishop_lookup(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().bishop.lookup(sq, occupied)
}
