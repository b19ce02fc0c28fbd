use std::time::{Duration, Instant};

/// Per-player time bookkeeping for rounds of `k` turns sharing one pool.
///
/// The pool and the turn counter are reset together when the last turn of
/// a round is recorded; every other turn is charged its measured elapsed
/// time against the pool.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeBudget {
    round_turns: u32,
    round_pool: Duration,
    pool_remaining: Duration,
    turns_remaining: u32,
    move_slice: Duration,
    turn_anchor: Option<Instant>,
}

impl TimeBudget {
    pub fn new(round_turns: u32, round_pool: Duration) -> Self {
        let round_turns = round_turns.max(1);
        Self {
            round_turns,
            round_pool,
            pool_remaining: round_pool,
            turns_remaining: round_turns,
            move_slice: Duration::ZERO,
            turn_anchor: None,
        }
    }

    pub fn from_secs(round_turns: u32, round_seconds: f64) -> Self {
        Self::new(round_turns, secs_to_duration(round_seconds))
    }

    pub fn round_turns(&self) -> u32 { self.round_turns }
    pub fn round_pool(&self) -> Duration { self.round_pool }
    pub fn pool_remaining(&self) -> Duration { self.pool_remaining }
    pub fn turns_remaining(&self) -> u32 { self.turns_remaining }
    /// Time allotted to the turn in progress (or the last one).
    pub fn move_slice(&self) -> Duration { self.move_slice }
    pub fn turn_anchor(&self) -> Option<Instant> { self.turn_anchor }

    /// Anchors the wall clock for a new turn.
    pub fn start_turn(&mut self) -> Instant {
        let now = Instant::now();
        self.turn_anchor = Some(now);
        now
    }

    pub fn set_move_slice(&mut self, slice: Duration) { self.move_slice = slice; }

    /// Closes the current turn: reset on the round's last turn, otherwise
    /// decrement the turn counter and charge `elapsed` to the pool.
    pub fn record_turn(&mut self, elapsed: Duration) {
        if self.turns_remaining <= 1 {
            self.turns_remaining = self.round_turns;
            self.pool_remaining = self.round_pool;
        } else {
            self.turns_remaining -= 1;
            self.pool_remaining = self.pool_remaining.saturating_sub(elapsed);
        }
        self.turn_anchor = None;
    }
}

/// Negative and NaN inputs clamp to zero; values too large for a
/// `Duration` saturate at `Duration::MAX`.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 { return Duration::ZERO; }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Wall-clock limit for one move; also the independent "no more time" check.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    anchor: Instant,
    allotted: Duration,
}

impl Deadline {
    pub fn new(anchor: Instant, allotted: Duration) -> Self { Self { anchor, allotted } }

    pub fn starting_now(allotted: Duration) -> Self { Self::new(Instant::now(), allotted) }

    /// `None` when the deadline lies beyond what `Instant` can represent.
    pub fn at(&self) -> Option<Instant> { self.anchor.checked_add(self.allotted) }
    pub fn allotted(&self) -> Duration { self.allotted }
    pub fn elapsed(&self) -> Duration { self.anchor.elapsed() }
    pub fn remaining(&self) -> Duration { self.allotted.saturating_sub(self.elapsed()) }
    pub fn expired(&self) -> bool { self.elapsed() >= self.allotted }
}
