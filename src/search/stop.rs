use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cooperative cancellation checked at every node the search enters.
///
/// Trips when the shared flag is raised or the optional deadline passes,
/// whichever comes first.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl StopSignal {
    pub fn never() -> Self { Self::default() }

    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag: Some(flag), deadline: None }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_tripped(&self) -> bool {
        if let Some(ref flag) = self.flag { if flag.load(Ordering::Relaxed) { return true; } }
        if let Some(dl) = self.deadline { if Instant::now() >= dl { return true; } }
        false
    }
}
