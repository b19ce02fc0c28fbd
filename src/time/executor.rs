//! Runs one search invocation under a hard deadline.
//!
//! The thread executor hands the callable to its own OS thread and waits on
//! a one-slot channel with a timeout: whichever of "result arrives" and
//! "timer fires" happens first wins. A late result lands in the channel
//! after the receiver is gone and is dropped there, so it is never
//! delivered and never touches caller state. The abandoned thread is not
//! killed; its stop signal is raised so a cooperative search unwinds at
//! the next node it enters.

use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{trace, warn};

use crate::error::ExecError;
use crate::search::stop::StopSignal;

pub const DEFAULT_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Completed<T> {
    pub value: T,
    pub elapsed: Duration,
}

pub trait Executor {
    /// Runs `f` and returns its value only if it finished within `limit`.
    ///
    /// `f` receives the stop signal it should poll; both timeouts and
    /// resource failures mean the result is unusable.
    fn invoke<T, F>(&self, f: F, limit: Duration) -> Result<Completed<T>, ExecError>
    where
        T: Send + 'static,
        F: FnOnce(StopSignal) -> T + Send + 'static;
}

#[derive(Clone, Debug)]
pub struct ThreadExecutor {
    stack_size: usize,
}

impl Default for ThreadExecutor {
    fn default() -> Self { Self { stack_size: DEFAULT_STACK_SIZE } }
}

impl ThreadExecutor {
    pub fn with_stack_size(stack_size: usize) -> Self { Self { stack_size } }
    pub fn stack_size(&self) -> usize { self.stack_size }
}

impl Executor for ThreadExecutor {
    fn invoke<T, F>(&self, f: F, limit: Duration) -> Result<Completed<T>, ExecError>
    where
        T: Send + 'static,
        F: FnOnce(StopSignal) -> T + Send + 'static,
    {
        if limit.is_zero() { return Err(ExecError::Timeout(limit)); }

        let started = Instant::now();
        let cancel = Arc::new(AtomicBool::new(false));
        let stop = StopSignal::from_flag(Arc::clone(&cancel));
        let (tx, rx) = mpsc::sync_channel::<T>(1);
        let handle = thread::Builder::new()
            .name("search".into())
            .stack_size(self.stack_size)
            .spawn(move || {
                let out = f(stop);
                // Fails only when the caller already gave up on us.
                let _ = tx.send(out);
            })
            .map_err(|e| {
                warn!("could not spawn search thread: {e}");
                ExecError::ResourceExhausted
            })?;

        match rx.recv_timeout(limit) {
            Ok(value) => {
                let elapsed = started.elapsed();
                let _ = handle.join();
                Ok(Completed { value, elapsed })
            }
            Err(RecvTimeoutError::Timeout) => {
                cancel.store(true, Ordering::Relaxed);
                drop(rx);
                trace!("search abandoned after {:?}", started.elapsed());
                Err(ExecError::Timeout(limit))
            }
            Err(RecvTimeoutError::Disconnected) => match handle.join() {
                // A collaborator bug, not a scheduling outcome.
                Err(payload) => panic::resume_unwind(payload),
                Ok(()) => Err(ExecError::ResourceExhausted),
            },
        }
    }
}

/// Runs the callable on the caller's thread with a deadline-only stop
/// signal. Cannot preempt a search that ignores its stop signal; a result
/// that arrives late is discarded all the same.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn invoke<T, F>(&self, f: F, limit: Duration) -> Result<Completed<T>, ExecError>
    where
        T: Send + 'static,
        F: FnOnce(StopSignal) -> T + Send + 'static,
    {
        if limit.is_zero() { return Err(ExecError::Timeout(limit)); }
        let started = Instant::now();
        let stop = match started.checked_add(limit) {
            Some(at) => StopSignal::never().with_deadline(at),
            None => StopSignal::never(),
        };
        let value = f(stop);
        let elapsed = started.elapsed();
        if elapsed > limit { return Err(ExecError::Timeout(limit)); }
        Ok(Completed { value, elapsed })
    }
}
