//! Search and evaluation for corvid.

pub mod config;
pub mod error;
pub mod eval;
pub mod search;
pub mod session;
pub mod time;

pub use config::EngineConfig;
pub use error::EngineError;
pub use eval::{Evaluator, MaterialPst};
pub use search::control::SearchControl;
pub use search::negamax::{MATE_SCORE, MATE_THRESHOLD, MAX_PLY};
pub use search::{SearchInfo, SearchResult, SearchState, Searcher, mate_distance};
pub use session::{Engine, MAX_GAME_MOVES};
pub use time::{SearchLimits, compute_limits, control_for};
