//! Round-level time scheduling around the search engine.

pub mod budget;
pub mod executor;
pub mod manager;
pub mod policy;

pub use budget::{Deadline, TimeBudget};
pub use executor::{Completed, Executor, InlineExecutor, ThreadExecutor};
pub use manager::{Decision, StopReason, TurnTimeBudgetManager};
pub use policy::{BranchingScaled, FrontLoaded, SlicePolicy, StabilityRule, Uniform};
