//! Timers
//!
//! Cancellable one-shot timers and a debouncer on top of them. Dropping a
//! handle cancels its callback, so anything holding a handle gets teardown
//! for free.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;

pub type TimerCallback = Box<dyn FnOnce()>;

/// Source of one-shot timers
pub trait Scheduler {
    /// Dropping the handle cancels the pending callback
    type Handle;

    fn schedule(&self, delay_ms: u32, callback: TimerCallback) -> Self::Handle;
}

/// `setTimeout` through gloo
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, callback: TimerCallback) -> Timeout {
        Timeout::new(delay_ms, callback)
    }
}

/// Runs a callback once `delay_ms` has passed without another trigger
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    delay_ms: u32,
    pending: RefCell<Option<S::Handle>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: S, delay_ms: u32) -> Self {
        Self {
            scheduler,
            delay_ms,
            pending: RefCell::new(None),
        }
    }

    /// Start a new window, cancelling the previous one
    pub fn trigger(&self, callback: impl FnOnce() + 'static) {
        let handle = self.scheduler.schedule(self.delay_ms, Box::new(callback));
        let previous = self.pending.replace(Some(handle));
        drop(previous);
    }

    pub fn cancel(&self) {
        let previous = self.pending.take();
        drop(previous);
    }
}

#[cfg(test)]
pub use manual::ManualScheduler;
