// Anytime alpha-beta search under a per-round time budget
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod search;
pub mod selfplay;
pub mod time;

pub use error::{ConfigError, DecideError, ExecError, SearchError};
pub use game::{GameState, SearchMove, Value, DRAW, LOSS, WIN};
pub use search::alphabeta::{SearchEngine, SearchOutcome};
pub use time::{TimeBudget, TurnTimeBudgetManager};
