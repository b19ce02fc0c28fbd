use std::sync::Arc;

use crate::error::SearchError;
use crate::game::{GameState, Value, DRAW, LOSS, WIN};
use crate::search::eval::{Evaluate, NeverExtend, SelectiveDeepening};
use crate::search::stop::StopSignal;

pub const DEFAULT_NO_PROGRESS_LIMIT: u32 = 50;
pub const DEFAULT_MAX_EXTENSION: u32 = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<M> {
    pub value: Value,
    pub best_move: Option<M>,
    pub nodes: u64,
}

/// Minimax with alpha-beta pruning and selective deepening.
///
/// Values are always from `root_player`'s point of view: the maximizing
/// side is the root player, the minimizing side its opponent. The engine
/// holds no per-search state, so one instance can serve every search.
pub struct SearchEngine<S: GameState> {
    root_player: S::Player,
    evaluate: Arc<dyn Evaluate<S>>,
    deepen: Arc<dyn SelectiveDeepening<S>>,
    no_progress_limit: u32,
    max_extension: u32,
    stop: StopSignal,
}

impl<S: GameState> Clone for SearchEngine<S> {
    fn clone(&self) -> Self {
        Self {
            root_player: self.root_player,
            evaluate: Arc::clone(&self.evaluate),
            deepen: Arc::clone(&self.deepen),
            no_progress_limit: self.no_progress_limit,
            max_extension: self.max_extension,
            stop: self.stop.clone(),
        }
    }
}

impl<S: GameState> SearchEngine<S> {
    pub fn new(root_player: S::Player, evaluate: impl Evaluate<S> + 'static) -> Self {
        Self {
            root_player,
            evaluate: Arc::new(evaluate),
            deepen: Arc::new(NeverExtend),
            no_progress_limit: DEFAULT_NO_PROGRESS_LIMIT,
            max_extension: DEFAULT_MAX_EXTENSION,
            stop: StopSignal::never(),
        }
    }

    pub fn with_deepening(mut self, deepen: impl SelectiveDeepening<S> + 'static) -> Self {
        self.deepen = Arc::new(deepen);
        self
    }

    pub fn with_no_progress_limit(mut self, turns: u32) -> Self {
        self.no_progress_limit = turns;
        self
    }

    /// Plies a selectively deepened line may run past the nominal limit.
    pub fn with_max_extension(mut self, plies: u32) -> Self {
        self.max_extension = plies;
        self
    }

    /// A copy of this engine that checks `stop` at every node.
    pub fn with_stop(&self, stop: StopSignal) -> Self {
        let mut e = self.clone();
        e.stop = stop;
        e
    }

    pub fn root_player(&self) -> S::Player { self.root_player }

    /// Full-window search from the root player's side.
    pub fn search_root(&self, state: &S, depth: u32) -> Result<SearchOutcome<S::Move>, SearchError> {
        self.search(state, depth, LOSS, WIN, true)
    }

    /// Full-window search that only considers `moves` at the root, in the
    /// given order. Deeper nodes still use every legal move.
    pub fn search_root_among(
        &self,
        state: &S,
        depth: u32,
        moves: &[S::Move],
    ) -> Result<SearchOutcome<S::Move>, SearchError> {
        let mut nodes = 0u64;
        let (value, best_move) = self.alphabeta(state, Some(moves), depth, 0, LOSS, WIN, true, &mut nodes)?;
        Ok(SearchOutcome { value, best_move, nodes })
    }

    pub fn search(
        &self,
        state: &S,
        depth: u32,
        alpha: Value,
        beta: Value,
        maximizing: bool,
    ) -> Result<SearchOutcome<S::Move>, SearchError> {
        let mut nodes = 0u64;
        let (value, best_move) = self.alphabeta(state, None, depth, 0, alpha, beta, maximizing, &mut nodes)?;
        Ok(SearchOutcome { value, best_move, nodes })
    }

    #[allow(clippy::too_many_arguments)]
    fn alphabeta(
        &self,
        state: &S,
        root_moves: Option<&[S::Move]>,
        depth: u32,
        extended: u32,
        mut alpha: Value,
        mut beta: Value,
        maximizing: bool,
        nodes: &mut u64,
    ) -> Result<(Value, Option<S::Move>), SearchError> {
        if self.stop.is_tripped() { return Err(SearchError::Interrupted); }
        *nodes += 1;

        let moves = match root_moves {
            Some(only) => only.to_vec(),
            None => state.legal_moves(),
        };
        if moves.is_empty() {
            // Game over is maximally good for whoever is not to move.
            let v = if state.current_player() != self.root_player { WIN } else { LOSS };
            return Ok((v, None));
        }
        if state.no_progress_count() >= self.no_progress_limit { return Ok((DRAW, None)); }

        let mut extended = extended;
        if depth == 0 {
            if extended >= self.max_extension || !self.deepen.should_extend(state) {
                return Ok((self.evaluate.evaluate(state), None));
            }
            extended += 1;
        }

        let mut best_value = if maximizing { LOSS } else { WIN };
        let mut best_move: Option<S::Move> = None;
        for mv in moves {
            let child = state.apply(&mv);
            let (v, _) = self.alphabeta(&child, None, depth.saturating_sub(1), extended, alpha, beta, !maximizing, nodes)?;
            // First improvement wins; equal values never displace an earlier move.
            let improves = if maximizing { v > best_value } else { v < best_value };
            if best_move.is_none() || improves {
                best_value = v;
                best_move = Some(mv);
            }
            if maximizing { alpha = alpha.max(v); } else { beta = beta.min(v); }
            if alpha >= beta { break; }
        }
        Ok((best_value, best_move))
    }
}
