//! End-to-end poll sessions against a scripted status source
//!
//! Runs on a paused tokio clock so inter-attempt waits complete instantly.

use async_trait::async_trait;
use mdpack_core_poll::{
    CancelSignal, PollOutcome, PollPhase, PollPolicy, PollSnapshot, Poller, StatusSource,
};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Queued,
    InProgress,
    Success,
    Error,
}

impl PollSnapshot for Status {
    fn phase(&self) -> PollPhase {
        match self {
            Status::Queued | Status::InProgress => PollPhase::Pending,
            Status::Success => PollPhase::Succeeded,
            Status::Error => PollPhase::Failed,
        }
    }
}

struct ScriptedSource {
    statuses: Mutex<VecDeque<Status>>,
    error_messages: Vec<String>,
    status_queries: AtomicUsize,
    error_queries: AtomicUsize,
    cancel_after_first_query: Option<CancelSignal>,
}

impl ScriptedSource {
    fn new(statuses: &[Status]) -> Self {
        Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            error_messages: Vec::new(),
            status_queries: AtomicUsize::new(0),
            error_queries: AtomicUsize::new(0),
            cancel_after_first_query: None,
        }
    }

    fn with_errors(mut self, messages: &[&str]) -> Self {
        self.error_messages = messages.iter().map(|m| m.to_string()).collect();
        self
    }

    fn cancelling(mut self, signal: CancelSignal) -> Self {
        self.cancel_after_first_query = Some(signal);
        self
    }

    fn status_queries(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }

    fn error_queries(&self) -> usize {
        self.error_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    type Snapshot = Status;
    type Error = io::Error;

    async fn fetch_status(&self, _request_id: &str) -> Result<Status, io::Error> {
        let n = self.status_queries.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            if let Some(signal) = &self.cancel_after_first_query {
                signal.cancel();
            }
        }
        let mut statuses = self.statuses.lock().unwrap();
        statuses
            .pop_front()
            .ok_or_else(|| io::Error::other("no more scripted statuses"))
    }

    async fn fetch_errors(&self, _request_id: &str) -> Result<Vec<String>, io::Error> {
        self.error_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.error_messages.clone())
    }
}

fn policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::fixed(max_attempts, Duration::from_secs(30))
}

#[tokio::test(start_paused = true)]
async fn test_in_progress_then_success() {
    let source = ScriptedSource::new(&[Status::InProgress, Status::InProgress, Status::Success]);
    let poller = Poller::new(policy(5));

    let outcome = poller.poll(&source, "08c000000000001").await.unwrap();

    assert_eq!(outcome, PollOutcome::Succeeded(Status::Success));
    assert_eq!(source.status_queries(), 3);
    assert_eq!(source.error_queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_budget_exhaustion_is_timeout_not_error() {
    let source = ScriptedSource::new(&[Status::InProgress, Status::InProgress]);
    let poller = Poller::new(policy(1));

    let outcome = poller.poll(&source, "08c000000000001").await.unwrap();

    assert_eq!(outcome, PollOutcome::TimedOut(Status::InProgress));
    assert_eq!(source.status_queries(), 2);
    assert_eq!(source.error_queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_fetches_details_once_in_order() {
    let source = ScriptedSource::new(&[Status::Error])
        .with_errors(&["Missing dependency: Foo", "Apex test failure", "Coverage 12%"]);
    let poller = Poller::new(policy(5));

    let outcome = poller.poll(&source, "08c000000000001").await.unwrap();

    match outcome {
        PollOutcome::Failed { snapshot, errors } => {
            assert_eq!(snapshot, Status::Error);
            assert_eq!(
                errors,
                vec![
                    "Missing dependency: Foo".to_string(),
                    "Apex test failure".to_string(),
                    "Coverage 12%".to_string(),
                ]
            );
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(source.status_queries(), 1);
    assert_eq!(source.error_queries(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_queued_counts_as_pending() {
    let source = ScriptedSource::new(&[Status::Queued, Status::InProgress, Status::Error]);
    let poller = Poller::new(policy(2));

    let outcome = poller.poll(&source, "08c000000000001").await.unwrap();

    assert!(matches!(outcome, PollOutcome::Failed { .. }));
    assert_eq!(source.status_queries(), 3);
    assert_eq!(source.error_queries(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_second_attempt() {
    let cancel = CancelSignal::new();
    let source = ScriptedSource::new(&[Status::InProgress, Status::Success])
        .cancelling(cancel.clone());
    let poller = Poller::new(policy(5)).with_cancel(cancel);

    let outcome = poller.poll(&source, "08c000000000001").await.unwrap();

    assert_eq!(outcome, PollOutcome::Cancelled(Some(Status::InProgress)));
    assert_eq!(source.status_queries(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_wakes_poller_during_wait() {
    let cancel = CancelSignal::new();
    let source = ScriptedSource::new(&[Status::InProgress, Status::Success]);
    let poller = Poller::new(PollPolicy::fixed(5, Duration::from_secs(3600))).with_cancel(cancel.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    });

    let outcome = poller.poll(&source, "08c000000000001").await.unwrap();
    canceller.await.unwrap();

    assert!(matches!(outcome, PollOutcome::Cancelled(_)));
    assert_eq!(source.status_queries(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_sessions_are_independent() {
    let source = ScriptedSource::new(&[Status::InProgress, Status::InProgress, Status::Success]);
    let poller = Poller::new(PollPolicy::once());

    let first = poller.poll(&source, "08c000000000001").await.unwrap();
    let second = poller.poll(&source, "08c000000000001").await.unwrap();
    let third = poller.poll(&source, "08c000000000001").await.unwrap();

    assert_eq!(first, PollOutcome::TimedOut(Status::InProgress));
    assert_eq!(second, PollOutcome::TimedOut(Status::InProgress));
    assert_eq!(third, PollOutcome::Succeeded(Status::Success));
}
