//! Errors surfaced by the search control surface.

use corvid_core::{CacheError, FenError, MoveParseError};

/// Failures of [`Engine`](crate::Engine) operations. The engine's state is
/// unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid position: {0}")]
    Fen(#[from] FenError),

    /// `index` counts from 0 in the supplied move list.
    #[error("move {index} of the move list: {source}")]
    Move { index: usize, source: MoveParseError },

    #[error("game line of {plies} plies exceeds the supported {max}")]
    GameTooLong { plies: usize, max: usize },

    #[error("hash table: {0}")]
    Cache(#[from] CacheError),
}
