//! Trailing-edge debouncing on the tokio timer

use std::time::Duration;

use tokio::task::AbortHandle;

/// A scheduled call that has not run yet
#[derive(Debug)]
pub struct DebounceHandle {
    handle: AbortHandle,
}

impl DebounceHandle {
    /// Drop the call if it has not run
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Run `f` after `delay` unless cancelled first
pub fn schedule_debounced<F>(f: F, delay: Duration) -> DebounceHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    });
    DebounceHandle {
        handle: task.abort_handle(),
    }
}

/// Only the last call in a burst runs, `delay` after it was made
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<DebounceHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending call with `f`
    pub fn call<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(schedule_debounced(f, self.delay));
    }

    /// Drop the pending call, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
