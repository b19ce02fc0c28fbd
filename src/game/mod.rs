//! Contracts between the search core and whatever game it is playing.
//!
//! The core never inspects a board: it enumerates moves, applies them to get
//! successors, and asks who is to move and how long nothing has happened.

use std::fmt::Debug;

pub mod tree;

/// Search value of a position; larger favors the searching player.
pub type Value = f64;

/// Reserved for a forced win of the root player.
pub const WIN: Value = f64::INFINITY;
/// Reserved for a forced loss of the root player.
pub const LOSS: Value = f64::NEG_INFINITY;
pub const DRAW: Value = 0.0;

pub trait SearchMove: Clone + Debug + Send + 'static {
    type Square: PartialEq + Debug;

    fn origin(&self) -> Self::Square;
    fn target(&self) -> Self::Square;

    /// Move identity as far as the scheduler is concerned.
    fn same_squares(&self, other: &Self) -> bool {
        self.origin() == other.origin() && self.target() == other.target()
    }
}

pub trait GameState: Clone + Send + 'static {
    type Move: SearchMove;
    type Player: Copy + Eq + Debug + Send + Sync + 'static;

    /// Legal moves for the side to move, in generator order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// The subset of legal moves that capture.
    fn capture_moves(&self) -> Vec<Self::Move>;

    fn apply(&self, mv: &Self::Move) -> Self;

    fn current_player(&self) -> Self::Player;

    /// Turns played since the last capture (or other irreversible progress).
    fn no_progress_count(&self) -> u32;

    fn is_terminal(&self) -> bool {
        self.legal_moves().is_empty()
    }
}
