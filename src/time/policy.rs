//! Tunable scheduling heuristics.
//!
//! How much of the pool a move receives, and when deepening may stop on a
//! converged answer, are policies rather than invariants: each is a value
//! the manager is built with and can be swapped per player.

use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::{SearchMove, Value};
use crate::time::budget::{secs_to_duration, TimeBudget};

pub const DEFAULT_MARGIN: Duration = Duration::from_millis(50);

pub trait SlicePolicy: Debug + Send + Sync {
    /// Time for the next move given the round state and the branching factor.
    fn slice(&self, budget: &TimeBudget, legal_moves: usize) -> Duration;
}

fn even_share(budget: &TimeBudget) -> f64 {
    budget.pool_remaining().as_secs_f64() / budget.turns_remaining().max(1) as f64
}

/// The remaining pool split evenly over the remaining turns, minus a margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniform {
    pub margin: Duration,
}

impl Default for Uniform {
    fn default() -> Self { Self { margin: DEFAULT_MARGIN } }
}

impl SlicePolicy for Uniform {
    fn slice(&self, budget: &TimeBudget, _legal_moves: usize) -> Duration {
        secs_to_duration(even_share(budget) - self.margin.as_secs_f64())
    }
}

/// Uniform, scaled down by `factor` when fewer than `below` moves are legal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchingScaled {
    pub below: usize,
    pub factor: f64,
    pub margin: Duration,
}

impl Default for BranchingScaled {
    fn default() -> Self { Self { below: 5, factor: 0.7, margin: DEFAULT_MARGIN } }
}

impl SlicePolicy for BranchingScaled {
    fn slice(&self, budget: &TimeBudget, legal_moves: usize) -> Duration {
        let base = even_share(budget) - self.margin.as_secs_f64();
        if legal_moves < self.below { secs_to_duration(self.factor * base) } else { secs_to_duration(base) }
    }
}

/// Early turns of a round get up to `1 + bias` times the even share; the
/// last turn gets whatever is left. Never hands out more than the pool less
/// one margin per remaining turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrontLoaded {
    pub bias: f64,
    pub margin: Duration,
}

impl Default for FrontLoaded {
    fn default() -> Self { Self { bias: 0.5, margin: DEFAULT_MARGIN } }
}

impl SlicePolicy for FrontLoaded {
    fn slice(&self, budget: &TimeBudget, _legal_moves: usize) -> Duration {
        let turns = budget.turns_remaining().max(1) as f64;
        let round = budget.round_turns().max(1) as f64;
        let margin = self.margin.as_secs_f64();
        let weight = 1.0 + self.bias.max(0.0) * (turns - 1.0) / round;
        let wanted = even_share(budget) * weight - margin;
        let cap = budget.pool_remaining().as_secs_f64() - margin * turns;
        secs_to_duration(wanted.min(cap))
    }
}

/// Stop deepening once the same (value, move) has come back `repeats` times
/// in a row past `after_depth`, provided at least `min_turns_remaining`
/// turns are left in the round to spend the savings on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityRule {
    pub repeats: u32,
    pub after_depth: u32,
    pub min_turns_remaining: u32,
}

impl Default for StabilityRule {
    fn default() -> Self { Self { repeats: 3, after_depth: 2, min_turns_remaining: 2 } }
}

#[derive(Debug)]
pub struct StabilityTracker {
    rule: StabilityRule,
    streak: u32,
}

impl StabilityTracker {
    pub fn new(rule: StabilityRule) -> Self { Self { rule, streak: 0 } }

    pub fn streak(&self) -> u32 { self.streak }

    /// Feeds one completed depth; `previous` is the last accepted answer.
    /// Returns true when deepening should stop.
    pub fn observe<M: SearchMove>(
        &mut self,
        depth: u32,
        value: Value,
        mv: &M,
        previous: Option<(Value, &M)>,
        turns_remaining: u32,
    ) -> bool {
        let repeated = match previous {
            Some((pv, pm)) => depth > self.rule.after_depth && pv == value && pm.same_squares(mv),
            None => false,
        };
        if repeated { self.streak += 1; } else { self.streak = 0; }
        turns_remaining >= self.rule.min_turns_remaining && self.streak >= self.rule.repeats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tree::TreeMove;

    fn mv(to: usize) -> TreeMove { TreeMove { from: 0, to } }

    #[test]
    fn streak_counts_only_past_after_depth() {
        let mut t = StabilityTracker::new(StabilityRule::default());
        let m = mv(1);
        assert!(!t.observe(1, 1.0, &m, None, 3));
        assert!(!t.observe(2, 1.0, &m, Some((1.0, &m)), 3));
        assert_eq!(t.streak(), 0);
        assert!(!t.observe(3, 1.0, &m, Some((1.0, &m)), 3));
        assert!(!t.observe(4, 1.0, &m, Some((1.0, &m)), 3));
        assert!(t.observe(5, 1.0, &m, Some((1.0, &m)), 3));
    }

    #[test]
    fn changed_answer_resets_streak() {
        let mut t = StabilityTracker::new(StabilityRule::default());
        let (a, b) = (mv(1), mv(2));
        t.observe(3, 1.0, &a, Some((1.0, &a)), 3);
        t.observe(4, 1.0, &a, Some((1.0, &a)), 3);
        assert!(!t.observe(5, 1.0, &b, Some((1.0, &a)), 3));
        assert_eq!(t.streak(), 0);
        assert!(!t.observe(6, 2.0, &b, Some((1.0, &b)), 3));
        assert_eq!(t.streak(), 0);
    }

    #[test]
    fn last_turn_of_round_never_converges() {
        let mut t = StabilityTracker::new(StabilityRule::default());
        let m = mv(1);
        for d in 3..10 {
            assert!(!t.observe(d, 0.0, &m, Some((0.0, &m)), 1));
        }
    }
}
