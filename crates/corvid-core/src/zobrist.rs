//! Zobrist keys, generated at compile time from a fixed xorshift64 stream.

use crate::castling::CastleRights;
use crate::piece::Piece;
use crate::square::Square;

struct Keys {
    piece_square: [[u64; 64]; 12],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    black_to_move: u64,
}

const SEED: u64 = 0x436f_7276_6964_2121;

const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

const fn generate() -> Keys {
    let mut state = SEED;
    let mut keys = Keys {
        piece_square: [[0; 64]; 12],
        castling: [0; 16],
        en_passant_file: [0; 8],
        black_to_move: 0,
    };

    let mut piece = 0;
    while piece < 12 {
        let mut sq = 0;
        while sq < 64 {
            state = xorshift64(state);
            keys.piece_square[piece][sq] = state;
            sq += 1;
        }
        piece += 1;
    }

    // Pattern 0 keeps key 0 so a position without rights hashes the same
    // whether or not the castling term is folded in.
    let mut rights = 1;
    while rights < 16 {
        state = xorshift64(state);
        keys.castling[rights] = state;
        rights += 1;
    }

    let mut file = 0;
    while file < 8 {
        state = xorshift64(state);
        keys.en_passant_file[file] = state;
        file += 1;
    }

    keys.black_to_move = xorshift64(state);
    keys
}

static KEYS: Keys = generate();

#[inline]
pub fn piece_square(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index()]
}

#[inline]
pub fn castling(rights: CastleRights) -> u64 {
    KEYS.castling[rights.bits() as usize]
}

/// Key for an en-passant target on the file of `sq`.
#[inline]
pub fn en_passant(sq: Square) -> u64 {
    KEYS.en_passant_file[sq.file() as usize]
}

#[inline]
pub fn black_to_move() -> u64 {
    KEYS.black_to_move
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::KEYS;

    #[test]
    fn keys_are_distinct_and_nonzero() {
        let mut seen = HashSet::new();
        let all = KEYS
            .piece_square
            .iter()
            .flatten()
            .chain(KEYS.castling[1..].iter())
            .chain(KEYS.en_passant_file.iter())
            .chain(std::iter::once(&KEYS.black_to_move));
        for &key in all {
            assert_ne!(key, 0);
            assert!(seen.insert(key), "duplicate key {key:#x}");
        }
        assert_eq!(seen.len(), 12 * 64 + 15 + 8 + 1);
    }

    #[test]
    fn empty_rights_have_no_key() {
        assert_eq!(KEYS.castling[0], 0);
    }
}
