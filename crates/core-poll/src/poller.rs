//! Poller implementation for long-running remote requests
//!
//! The poller is read-only: it only ever *asks* the status source about a
//! request and never changes server state, so running a fresh session for a
//! request id that was polled before is always safe.

use crate::cancel::CancelSignal;
use crate::error::PollError;
use crate::policy::PollPolicy;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Coarse classification of a status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Queued or in progress; keep polling
    Pending,
    /// Finished successfully
    Succeeded,
    /// Finished with an error; error details should be fetched
    Failed,
}

/// A status snapshot the poller can classify
pub trait PollSnapshot {
    /// Phase this snapshot is in
    fn phase(&self) -> PollPhase;
}

/// Source of status snapshots for a request id
///
/// Implementations wrap whatever transport actually answers the question.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Snapshot type produced by one status query
    type Snapshot: PollSnapshot + Send;

    /// Error produced when the source cannot answer
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current status of a request
    async fn fetch_status(&self, request_id: &str) -> Result<Self::Snapshot, Self::Error>;

    /// Fetch error details for a failed request, in the order the source returns them
    async fn fetch_errors(&self, request_id: &str) -> Result<Vec<String>, Self::Error>;
}

/// Terminal result of a poll session
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<S> {
    /// The request completed successfully
    Succeeded(S),

    /// The request failed; `errors` holds the fetched error details
    Failed { snapshot: S, errors: Vec<String> },

    /// The attempt budget ran out while the request was still pending
    TimedOut(S),

    /// The cancel signal tripped; carries the last snapshot seen, if any
    Cancelled(Option<S>),
}

impl<S> PollOutcome<S> {
    /// Last snapshot observed by the session
    pub fn snapshot(&self) -> Option<&S> {
        match self {
            PollOutcome::Succeeded(s)
            | PollOutcome::Failed { snapshot: s, .. }
            | PollOutcome::TimedOut(s) => Some(s),
            PollOutcome::Cancelled(s) => s.as_ref(),
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            PollOutcome::Succeeded(_) => "succeeded",
            PollOutcome::Failed { .. } => "failed",
            PollOutcome::TimedOut(_) => "timed-out",
            PollOutcome::Cancelled(_) => "cancelled",
        }
    }
}

/// Transient state of one poll session
#[derive(Debug)]
pub struct PollState<S> {
    /// Request being polled
    pub request_id: String,
    /// Follow-up queries made so far (never exceeds `max_attempts`)
    pub attempts_made: u32,
    /// Follow-up query budget
    pub max_attempts: u32,
    /// Most recent pending snapshot
    pub last_status: Option<S>,
}

impl<S> PollState<S> {
    fn new(request_id: &str, max_attempts: u32) -> Self {
        Self {
            request_id: request_id.to_string(),
            attempts_made: 0,
            max_attempts,
            last_status: None,
        }
    }

    fn budget_exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts
    }
}

/// Drives a [`StatusSource`] until the request reaches a terminal state
#[derive(Debug, Clone, Default)]
pub struct Poller {
    policy: PollPolicy,
    cancel: CancelSignal,
}

impl Poller {
    /// Create a poller with the given policy and a private cancel signal
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            cancel: CancelSignal::new(),
        }
    }

    /// Use an externally owned cancel signal
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Poll `request_id` until it succeeds, fails, runs out of budget, or is cancelled
    ///
    /// Error details are fetched exactly once, and only when the request is
    /// observed in the failed phase. A failing query aborts the session with
    /// a [`PollError`].
    pub async fn poll<Src>(
        &self,
        source: &Src,
        request_id: &str,
    ) -> Result<PollOutcome<Src::Snapshot>, PollError<Src::Error>>
    where
        Src: StatusSource + ?Sized,
    {
        let mut state = PollState::new(request_id, self.policy.max_attempts);

        loop {
            if self.cancel.is_cancelled() {
                info!(
                    request_id,
                    attempts = state.attempts_made,
                    "Poll session cancelled"
                );
                return Ok(PollOutcome::Cancelled(state.last_status.take()));
            }

            debug!(
                request_id,
                attempt = state.attempts_made,
                max_attempts = state.max_attempts,
                "Querying request status"
            );

            let snapshot =
                source
                    .fetch_status(request_id)
                    .await
                    .map_err(|source| PollError::Status {
                        request_id: request_id.to_string(),
                        source,
                    })?;

            match snapshot.phase() {
                PollPhase::Succeeded => {
                    info!(request_id, attempts = state.attempts_made, "Request succeeded");
                    return Ok(PollOutcome::Succeeded(snapshot));
                }
                PollPhase::Failed => {
                    let errors = source.fetch_errors(request_id).await.map_err(|source| {
                        PollError::ErrorDetails {
                            request_id: request_id.to_string(),
                            source,
                        }
                    })?;
                    warn!(
                        request_id,
                        error_count = errors.len(),
                        "Request finished with errors"
                    );
                    return Ok(PollOutcome::Failed { snapshot, errors });
                }
                PollPhase::Pending => {
                    if state.budget_exhausted() {
                        info!(
                            request_id,
                            attempts = state.attempts_made,
                            "Poll budget exhausted while request still pending"
                        );
                        return Ok(PollOutcome::TimedOut(snapshot));
                    }

                    state.last_status = Some(snapshot);
                    state.attempts_made += 1;

                    let delay = self.policy.delay_for(state.attempts_made);
                    debug!(request_id, ?delay, "Request pending, waiting before next query");
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Snap(PollPhase);

    impl PollSnapshot for Snap {
        fn phase(&self) -> PollPhase {
            self.0
        }
    }

    struct Scripted {
        phases: Mutex<VecDeque<PollPhase>>,
        status_calls: AtomicUsize,
        error_calls: AtomicUsize,
    }

    impl Scripted {
        fn new(phases: &[PollPhase]) -> Self {
            Self {
                phases: Mutex::new(phases.iter().copied().collect()),
                status_calls: AtomicUsize::new(0),
                error_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatusSource for Scripted {
        type Snapshot = Snap;
        type Error = io::Error;

        async fn fetch_status(&self, _request_id: &str) -> Result<Snap, io::Error> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut phases = self.phases.lock().unwrap();
            phases
                .pop_front()
                .map(Snap)
                .ok_or_else(|| io::Error::other("script exhausted"))
        }

        async fn fetch_errors(&self, _request_id: &str) -> Result<Vec<String>, io::Error> {
            self.error_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec!["boom".to_string()])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_polls_exactly_once() {
        let source = Scripted::new(&[PollPhase::Pending, PollPhase::Succeeded]);
        let poller = Poller::new(PollPolicy::once());

        let outcome = poller.poll(&source, "req").await.unwrap();

        assert_eq!(outcome, PollOutcome::TimedOut(Snap(PollPhase::Pending)));
        assert_eq!(source.status_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_skips_error_fetch() {
        let source = Scripted::new(&[PollPhase::Succeeded]);
        let poller = Poller::new(PollPolicy::fixed(3, Duration::from_secs(1)));

        let outcome = poller.poll(&source, "req").await.unwrap();

        assert!(matches!(outcome, PollOutcome::Succeeded(_)));
        assert_eq!(source.error_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_error_aborts_session() {
        let source = Scripted::new(&[PollPhase::Pending]);
        let poller = Poller::new(PollPolicy::fixed(3, Duration::from_secs(1)));

        let err = poller.poll(&source, "req-9").await.unwrap_err();

        assert!(matches!(err, PollError::Status { .. }));
        assert_eq!(err.request_id(), "req-9");
        assert_eq!(source.status_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_poller_never_queries() {
        let source = Scripted::new(&[PollPhase::Succeeded]);
        let cancel = CancelSignal::new();
        cancel.cancel();
        let poller = Poller::new(PollPolicy::once()).with_cancel(cancel);

        let outcome = poller.poll(&source, "req").await.unwrap();

        assert_eq!(outcome, PollOutcome::Cancelled(None));
        assert_eq!(source.status_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_outcome_snapshot_and_label() {
        let outcome = PollOutcome::Failed {
            snapshot: Snap(PollPhase::Failed),
            errors: vec![],
        };
        assert_eq!(outcome.snapshot(), Some(&Snap(PollPhase::Failed)));
        assert_eq!(outcome.label(), "failed");
        assert_eq!(PollOutcome::<Snap>::Cancelled(None).snapshot(), None);
    }
}
