use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Single-slot cancellable timer: `schedule` replaces whatever is pending,
/// so rapid re-scheduling coalesces into one firing after a quiet period.
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

    /// Arm `armed` to run after the quiet period, replacing any pending
    /// timer. Once the period has elapsed the future is detached onto its
    /// own task: `cancel` only ever kills the wait, never a firing that
    /// already started.
    pub fn schedule<F>(&mut self, armed: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(armed);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
