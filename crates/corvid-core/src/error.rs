//! Error types for position text, board validation, move text and cache sizing.

/// Errors produced while parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },

    /// `rank_index` counts from the top of the board (0 = rank 8).
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },

    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },

    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },

    #[error("invalid castling field: \"{found}\"")]
    InvalidCastling { found: String },

    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },

    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },

    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Structural problems found by [`Position::validate`](crate::position::Position::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: &'static str, count: u32 },

    #[error("pawns on first or eighth rank")]
    PawnsOnBackRank,

    #[error("piece bitboards overlap")]
    OverlappingPieces,

    #[error("square cache disagrees with bitboards at {square}")]
    StaleSquareCache { square: String },

    #[error("side-to-move can capture the enemy king")]
    OpponentInCheck,

    #[error("incremental hash {incremental:#018x} differs from recomputed {recomputed:#018x}")]
    HashMismatch { incremental: u64, recomputed: u64 },
}

/// Errors produced while resolving move text against a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("malformed move text: \"{text}\"")]
    Malformed { text: String },

    #[error("move \"{text}\" is not legal in this position")]
    Illegal { text: String },

    #[error("move \"{text}\" is ambiguous")]
    Ambiguous { text: String },
}

/// Errors from sizing a [`SizedCache`](crate::cache::SizedCache).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache budget of {megabytes} MB holds no entries")]
    ZeroCapacity { megabytes: usize },
}

#[cfg(test)]
mod tests {
    use super::{BoardError, FenError, MoveParseError};

    #[test]
    fn fen_error_wraps_board_error() {
        let err: FenError = BoardError::PawnsOnBackRank.into();
        assert_eq!(err.to_string(), "invalid board: pawns on first or eighth rank");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn move_parse_error_display() {
        let err = MoveParseError::Illegal { text: "e2e5".to_string() };
        assert_eq!(err.to_string(), "move \"e2e5\" is not legal in this position");
    }
}
