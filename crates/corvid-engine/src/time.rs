//! Time management: turn clock parameters into search limits.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::search::control::SearchControl;

/// Moves assumed to remain when the clock gives no `movestogo`.
const DEFAULT_MOVES_TO_GO: u32 = 40;

/// Everything a caller can constrain a search with.
///
/// Clock fields are for the side to move only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub time_left: Option<Duration>,
    pub increment: Duration,
    pub moves_to_go: Option<u32>,
    pub move_time: Option<Duration>,
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> SearchLimits {
        SearchLimits { depth: Some(depth), ..SearchLimits::default() }
    }

    pub fn move_time(time: Duration) -> SearchLimits {
        SearchLimits { move_time: Some(time), ..SearchLimits::default() }
    }
}

/// Soft and hard limits for a clock with `time_left` remaining.
///
/// The target is an even share of the remaining time plus three quarters of
/// the increment. A target beyond the time left falls back to the time left
/// minus overhead. The hard limit is three targets, capped the same way.
pub fn compute_limits(
    time_left: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
    overhead: Duration,
) -> (Duration, Duration) {
    let floor = Duration::from_millis(1);
    let usable = time_left.saturating_sub(overhead).max(floor);
    let moves = moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);

    let mut target = time_left / moves + increment * 3 / 4;
    if target >= time_left {
        target = usable;
    }
    let target = target.min(usable).max(floor);
    let hard = (target * 3).min(usable);
    (target, hard)
}

/// Build the [`SearchControl`] for `limits`.
///
/// A fixed move time wins over the clock; with neither (or `infinite`) only
/// the stop flag, depth and node limits end the search.
pub fn control_for(limits: &SearchLimits, overhead: Duration, stopped: Arc<AtomicBool>) -> SearchControl {
    let control = if limits.infinite {
        SearchControl::new_infinite(stopped)
    } else if let Some(move_time) = limits.move_time {
        let budget = move_time.saturating_sub(overhead).max(Duration::from_millis(1));
        SearchControl::new_timed(stopped, budget, budget)
    } else if let Some(time_left) = limits.time_left {
        let (soft, hard) = compute_limits(time_left, limits.increment, limits.moves_to_go, overhead);
        SearchControl::new_timed(stopped, soft, hard)
    } else {
        SearchControl::new_infinite(stopped)
    };
    control.with_node_limit(limits.nodes)
}
