//! Engine settings adjustable at runtime.

use std::time::Duration;

/// Knobs the front end exposes as options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Centipawns the engine gives up to avoid a draw.
    pub contempt: i32,
    /// Time reserved per move for communication lag.
    pub move_overhead_ms: u64,
}

impl EngineConfig {
    pub fn move_overhead(&self) -> Duration {
        Duration::from_millis(self.move_overhead_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig { hash_mb: 16, contempt: 0, move_overhead_ms: 30 }
    }
}
