//! Scheduler port
//!
//! Delayed and periodic callback execution, owned by the hosting runtime.
//! Every scheduled callback is fire-and-forget from the scheduler's point
//! of view; callbacks that need to mutate poll state must post a command
//! back into the serialized loop instead of touching state directly.

use std::time::Duration;

/// Cancellable handle to a scheduled callback
///
/// The entity that owns the state a timer protects also owns the guard
/// (the coordinator holds its poll's end-timer) and cancels it on every
/// terminal transition. Cancelling an already-fired or already-cancelled
/// timer is a no-op.
pub trait TimerGuard: Send {
    fn cancel(&self);
}

/// Delayed and periodic execution
pub trait Scheduler: Send + Sync {
    /// Run `callback` once after `delay`.
    fn after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> Box<dyn TimerGuard>;

    /// Run `callback` every `period`, starting one period from now.
    fn every(&self, period: Duration, callback: Box<dyn Fn() + Send>) -> Box<dyn TimerGuard>;
}
