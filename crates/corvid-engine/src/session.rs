//! The search control surface: one game's position, searcher and settings.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use corvid_core::{MAX_GAME_PLY, Position};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::search::negamax::MAX_PLY;
use crate::search::{SearchInfo, SearchResult, Searcher};
use crate::time::{SearchLimits, control_for};

/// Longest move list [`Engine::set_position`] accepts; the search needs
/// `MAX_PLY` more plies of room on top.
pub const MAX_GAME_MOVES: usize = MAX_GAME_PLY - MAX_PLY;

/// Owns everything a front end drives: the game position, the searcher with
/// its transposition table, and the configuration.
pub struct Engine {
    position: Position,
    searcher: Searcher,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Engine, EngineError> {
        let mut searcher = Searcher::new(config.hash_mb)?;
        searcher.set_contempt(config.contempt);
        Ok(Engine { position: Position::startpos(), searcher, config })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load `fen` (the start position when `None`) and play `moves` in
    /// coordinate notation. On error the current position is kept.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[&str]) -> Result<(), EngineError> {
        if moves.len() > MAX_GAME_MOVES {
            return Err(EngineError::GameTooLong { plies: moves.len(), max: MAX_GAME_MOVES });
        }

        let mut scratch = match fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::startpos(),
        };
        for (index, text) in moves.iter().enumerate() {
            let mv = scratch.parse_move(text).map_err(|source| EngineError::Move { index, source })?;
            scratch.make_move(mv);
        }

        debug!(fen = %scratch, moves = moves.len(), "position set");
        self.position = scratch;
        Ok(())
    }

    /// Search the current position within `limits`. Raising `stop` ends the
    /// search at the next poll; the best move of the deepest finished pass
    /// is returned either way.
    pub fn search<F>(&mut self, limits: &SearchLimits, stop: Arc<AtomicBool>, on_depth: F) -> SearchResult
    where
        F: FnMut(&SearchInfo),
    {
        let control = control_for(limits, self.config.move_overhead(), stop);
        let max_depth = limits.depth.unwrap_or(u8::MAX);
        self.searcher.search(&mut self.position, max_depth, &control, on_depth)
    }

    /// Forget the previous game: tables are wiped and the board reset.
    pub fn new_game(&mut self) {
        self.searcher.clear();
        self.position = Position::startpos();
        info!("new game");
    }

    /// Reallocate the transposition table. A zero budget is rejected and
    /// leaves the current table in place.
    pub fn set_hash_size(&mut self, megabytes: usize) -> Result<(), EngineError> {
        self.searcher.resize_tt(megabytes)?;
        self.config.hash_mb = megabytes;
        debug!(megabytes, "hash resized");
        Ok(())
    }

    pub fn set_contempt(&mut self, contempt: i32) {
        self.config.contempt = contempt;
        self.searcher.set_contempt(contempt);
    }

    pub fn set_move_overhead(&mut self, millis: u64) {
        self.config.move_overhead_ms = millis;
    }
}
