//! Cooperative cancellation for poll sessions
//!
//! A [`CancelSignal`] is a cloneable flag. The poller checks it at the top of
//! every iteration and also wakes early from its inter-attempt wait when the
//! signal trips, so a cancelled session ends without sleeping out the
//! remainder of its interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared cancellation flag
///
/// Clones observe the same flag. Once cancelled, a signal stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

impl CancelSignal {
    /// Create a signal that has not been tripped
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the signal and wake every task waiting on [`CancelSignal::cancelled`]
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether the signal has been tripped
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the signal is tripped
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel() is not missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_signal_is_not_cancelled() {
        let signal = CancelSignal::new();
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = CancelSignal::new();
        let clone = signal.clone();

        clone.cancel();

        assert!(signal.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_immediately_when_already_tripped() {
        let signal = CancelSignal::new();
        signal.cancel();

        tokio::time::timeout(Duration::from_millis(50), signal.cancelled())
            .await
            .expect("cancelled() should resolve for a tripped signal");
    }

    #[test]
    fn test_cancelled_pending_until_tripped() {
        let signal = CancelSignal::new();
        let mut waiter = tokio_test::task::spawn(signal.cancelled());

        tokio_test::assert_pending!(waiter.poll());

        signal.cancel();
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let signal = CancelSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };

        tokio::task::yield_now().await;
        signal.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
