//! Tokio-backed scheduler adapter
//!
//! Implements the application's [`Scheduler`] port with spawned tasks and
//! `tokio::time`. Cancellation goes through a [`CancellationToken`]: the
//! guard trips the token, and the timer task observes it before running
//! its callback, so a cancelled timer can never fire late.

use nightpoll_application::ports::scheduler::{Scheduler, TimerGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scheduler running callbacks on the tokio runtime
#[derive(Debug, Default, Clone)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

struct TokenGuard(CancellationToken);

impl TimerGuard for TokenGuard {
    fn cancel(&self) {
        self.0.cancel();
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> Box<dyn TimerGuard> {
        let token = CancellationToken::new();
        let task_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => callback(),
            }
        });
        Box::new(TokenGuard(token))
    }

    fn every(&self, period: Duration, callback: Box<dyn Fn() + Send>) -> Box<dyn TimerGuard> {
        let token = CancellationToken::new();
        let task_token = token.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The immediate first tick would run the callback at zero delay
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => return,
                    _ = interval.tick() => callback(),
                }
            }
        });
        Box::new(TokenGuard(token))
    }
}
