use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::DecideError;
use crate::game::GameState;
use crate::time::budget::TimeBudget;
use crate::time::executor::{Executor, ThreadExecutor};
use crate::time::manager::{Decision, TurnTimeBudgetManager};

pub trait Player<S: GameState> {
    fn name(&self) -> &str;

    /// `legal` is never empty when called by the game driver.
    fn choose(&mut self, state: &S, legal: &[S::Move]) -> Result<S::Move, DecideError>;
}

/// Time-managed alpha-beta player; owns its budget for the whole game.
pub struct AlphaBetaPlayer<S: GameState, X: Executor = ThreadExecutor> {
    name: String,
    manager: TurnTimeBudgetManager<S, X>,
    budget: TimeBudget,
    last: Option<Decision<S::Move>>,
}

impl<S: GameState, X: Executor> AlphaBetaPlayer<S, X> {
    pub fn new(name: impl Into<String>, manager: TurnTimeBudgetManager<S, X>, budget: TimeBudget) -> Self {
        Self { name: name.into(), manager, budget, last: None }
    }

    pub fn budget(&self) -> &TimeBudget { &self.budget }

    /// Report for the most recent move.
    pub fn last_decision(&self) -> Option<&Decision<S::Move>> { self.last.as_ref() }
}

impl<S: GameState, X: Executor> Player<S> for AlphaBetaPlayer<S, X> {
    fn name(&self) -> &str { &self.name }

    fn choose(&mut self, state: &S, legal: &[S::Move]) -> Result<S::Move, DecideError> {
        let d = self.manager.decide_with_report(&mut self.budget, state, legal)?;
        let mv = d.chosen.clone();
        self.last = Some(d);
        Ok(mv)
    }
}

/// Uniformly random legal moves; a baseline opponent.
pub struct RandomPlayer {
    rng: SmallRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self { Self { rng: SmallRng::seed_from_u64(seed) } }
}

impl<S: GameState> Player<S> for RandomPlayer {
    fn name(&self) -> &str { "random" }

    fn choose(&mut self, _state: &S, legal: &[S::Move]) -> Result<S::Move, DecideError> {
        if legal.is_empty() { return Err(DecideError::NoLegalMoves); }
        Ok(legal[self.rng.gen_range(0..legal.len())].clone())
    }
}
