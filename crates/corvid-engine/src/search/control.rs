//! Stop flag, clock and node limits polled by the search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Nodes between two clock checks; must be a power of two.
pub const CHECK_INTERVAL: u64 = 2048;

/// Decides when a running search has to give up.
///
/// The external flag is shared with whoever may request a stop; the clock and
/// node limits are private to one search.
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl SearchControl {
    /// No clock: only the flag (and an optional node limit) stops the search.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> SearchControl {
        SearchControl { stopped, start: Instant::now(), soft_limit: None, hard_limit: None, node_limit: None }
    }

    /// Clock starts now.
    pub fn new_timed(stopped: Arc<AtomicBool>, soft: Duration, hard: Duration) -> SearchControl {
        SearchControl {
            stopped,
            start: Instant::now(),
            soft_limit: Some(soft),
            hard_limit: Some(hard),
            node_limit: None,
        }
    }

    pub fn with_node_limit(mut self, nodes: Option<u64>) -> SearchControl {
        self.node_limit = nodes;
        self
    }

    /// Whether the search must abort now.
    ///
    /// The flag and node limit are read on every call, the clock only every
    /// [`CHECK_INTERVAL`] nodes. Tripping a limit raises the flag so later
    /// calls return at once.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        let out_of_nodes = self.node_limit.is_some_and(|limit| nodes >= limit);
        let out_of_time = nodes & (CHECK_INTERVAL - 1) == 0
            && self.hard_limit.is_some_and(|hard| self.elapsed() >= hard);
        if out_of_nodes || out_of_time {
            self.stopped.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Whether another iteration may start. Enforces the soft limit.
    pub fn should_start_iteration(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return false;
        }
        self.soft_limit.is_none_or(|soft| self.elapsed() < soft)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
