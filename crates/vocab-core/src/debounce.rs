//! Trailing-edge debouncing on the tokio runtime.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs only the last of a burst of calls, once the burst has been quiet
/// for the configured delay.
///
/// Each [`call`](Debouncer::call) aborts the pending timer and schedules a
/// new one. Dropping the debouncer cancels whatever is pending.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `f` to run after the quiet period, replacing any pending call.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn call<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        }));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled call has yet to run.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
