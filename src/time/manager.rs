use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{DecideError, ExecError, SearchError};
use crate::game::{GameState, Value, LOSS, WIN};
use crate::search::alphabeta::SearchEngine;
use crate::time::budget::{Deadline, TimeBudget};
use crate::time::executor::{Executor, ThreadExecutor};
use crate::time::policy::{SlicePolicy, StabilityRule, StabilityTracker, Uniform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Only one legal move; nothing was searched.
    SingleMove,
    /// The executor gave up on the running depth.
    Timeout,
    ResourceExhausted,
    /// A depth finished but the move's slice had already run out.
    OutOfTime,
    ForcedWin,
    ForcedLoss,
    Converged,
    DepthLimit,
    /// The root was scored without a move (terminal or no-progress draw).
    Settled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::SingleMove => "single legal move",
            StopReason::Timeout => "timeout",
            StopReason::ResourceExhausted => "resources exhausted",
            StopReason::OutOfTime => "no more time",
            StopReason::ForcedWin => "forced win",
            StopReason::ForcedLoss => "forced loss",
            StopReason::Converged => "converged",
            StopReason::DepthLimit => "depth limit",
            StopReason::Settled => "settled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Decision<M> {
    pub chosen: M,
    /// Root value of the deepest accepted iteration, if any completed.
    pub value: Option<Value>,
    /// Deepest accepted depth; 0 when the fallback move was returned.
    pub depth: u32,
    pub stop: StopReason,
    pub elapsed: Duration,
    /// Wall time of the deepest accepted iteration alone.
    pub depth_elapsed: Option<Duration>,
    pub nodes: u64,
}

/// Drives iterative deepening for one player and keeps its round budget.
pub struct TurnTimeBudgetManager<S: GameState, X: Executor = ThreadExecutor> {
    engine: SearchEngine<S>,
    executor: X,
    slice_policy: Box<dyn SlicePolicy>,
    stability: Option<StabilityRule>,
    max_depth: Option<u32>,
}

impl<S: GameState> TurnTimeBudgetManager<S, ThreadExecutor> {
    pub fn new(engine: SearchEngine<S>) -> Self {
        Self::with_executor(engine, ThreadExecutor::default())
    }
}

impl<S: GameState, X: Executor> TurnTimeBudgetManager<S, X> {
    pub fn with_executor(engine: SearchEngine<S>, executor: X) -> Self {
        Self {
            engine,
            executor,
            slice_policy: Box::new(Uniform::default()),
            stability: Some(StabilityRule::default()),
            max_depth: None,
        }
    }

    pub fn slice_policy(mut self, policy: Box<dyn SlicePolicy>) -> Self {
        self.slice_policy = policy;
        self
    }

    pub fn stability(mut self, rule: Option<StabilityRule>) -> Self {
        self.stability = rule;
        self
    }

    pub fn max_depth(mut self, depth: Option<u32>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn engine(&self) -> &SearchEngine<S> { &self.engine }

    pub fn decide(&self, budget: &mut TimeBudget, state: &S, legal: &[S::Move]) -> Result<S::Move, DecideError> {
        self.decide_with_report(budget, state, legal).map(|d| d.chosen)
    }

    /// Picks a move within this turn's slice of `budget` and closes the turn.
    ///
    /// Always returns one of `legal`: the root search only considers those
    /// moves, and the first one is returned if not even depth 1 completed. Fails only when `legal` is empty, in which case the
    /// budget is left untouched.
    pub fn decide_with_report(
        &self,
        budget: &mut TimeBudget,
        state: &S,
        legal: &[S::Move],
    ) -> Result<Decision<S::Move>, DecideError> {
        let first = legal.first().cloned().ok_or(DecideError::NoLegalMoves)?;
        let anchor = budget.start_turn();
        let slice = self.slice_policy.slice(budget, legal.len());
        budget.set_move_slice(slice);

        if legal.len() == 1 {
            let elapsed = anchor.elapsed();
            budget.record_turn(elapsed);
            debug!("single legal move {:?}, turns left in round {}", first, budget.turns_remaining());
            return Ok(Decision {
                chosen: first,
                value: None,
                depth: 0,
                stop: StopReason::SingleMove,
                elapsed,
                depth_elapsed: None,
                nodes: 0,
            });
        }

        if state.current_player() != self.engine.root_player() {
            warn!("searching for {:?} but {:?} is to move", self.engine.root_player(), state.current_player());
        }

        let deadline = Deadline::new(anchor, slice);
        let mut best = first;
        let mut best_value: Option<Value> = None;
        let mut reached = 0u32;
        let mut depth_elapsed: Option<Duration> = None;
        let mut nodes = 0u64;
        let mut tracker = self.stability.map(StabilityTracker::new);
        let mut depth = 1u32;

        let stop = loop {
            if let Some(max) = self.max_depth { if depth > max { break StopReason::DepthLimit; } }
            let remaining = deadline.remaining();
            debug!(
                "going to depth {depth}, remaining {:.3}s, value {:?}, best {:?}",
                remaining.as_secs_f64(), best_value, best
            );

            let engine = self.engine.clone();
            let root = state.clone();
            let moves = legal.to_vec();
            let at = deadline.at();
            let run = self.executor.invoke(
                move |stop| {
                    let stop = match at { Some(at) => stop.with_deadline(at), None => stop };
                    engine.with_stop(stop).search_root_among(&root, depth, &moves)
                },
                remaining,
            );
            let (outcome, took) = match run {
                Ok(done) => match done.value {
                    Ok(o) => {
                        debug!("depth {depth} done in {:?}, {} nodes", done.elapsed, o.nodes);
                        (o, done.elapsed)
                    }
                    Err(SearchError::Interrupted) => break StopReason::Timeout,
                },
                Err(ExecError::Timeout(_)) => break StopReason::Timeout,
                Err(ExecError::ResourceExhausted) => break StopReason::ResourceExhausted,
            };

            if deadline.expired() { break StopReason::OutOfTime; }
            let Some(mv) = outcome.best_move else { break StopReason::Settled; };
            nodes += outcome.nodes;

            let converged = match tracker.as_mut() {
                Some(t) => t.observe(depth, outcome.value, &mv, best_value.map(|v| (v, &best)), budget.turns_remaining()),
                None => false,
            };
            best = mv;
            best_value = Some(outcome.value);
            reached = depth;
            depth_elapsed = Some(took);

            if converged { break StopReason::Converged; }
            if outcome.value == WIN { break StopReason::ForcedWin; }
            if outcome.value == LOSS { break StopReason::ForcedLoss; }
            depth += 1;
        };

        let elapsed = anchor.elapsed();
        budget.record_turn(elapsed);
        info!(
            "chose {:?} at depth {reached} ({stop}) in {:.3}s of {:.3}s, pool {:.3}s, turns left {}",
            best, elapsed.as_secs_f64(), slice.as_secs_f64(),
            budget.pool_remaining().as_secs_f64(), budget.turns_remaining()
        );
        Ok(Decision { chosen: best, value: best_value, depth: reached, stop, elapsed, depth_elapsed, nodes })
    }
}
