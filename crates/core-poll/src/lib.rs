//! mdpack Core Poll: Pure-logic polling of long-running remote requests
//!
//! # Overview
//!
//! Server-side operations such as package version creation or package
//! uninstall are asynchronous: the caller receives a request id and has to
//! come back later to learn the outcome. This crate drives that "come back
//! later" loop:
//!
//! - **Poller**: status state machine with a bounded attempt budget
//! - **Poll Policy**: fixed or exponential wait between attempts
//! - **Cancel Signal**: cooperative cancellation checked every iteration
//!
//! # Key Principles
//!
//! This crate is **pure logic** with zero knowledge of:
//! - The remote platform or its query language
//! - How a status record is fetched (HTTP, fixtures, in-memory fakes)
//! - Command-line presentation
//!
//! Callers plug in a [`StatusSource`] that knows how to fetch one status
//! snapshot and, on failure, the error details for a request id.
//!
//! # State Machine
//!
//! ```text
//!   Pending (attempt 0)
//!        │ fetch status
//!        ▼
//!   Polling (attempt k) ──── Success ───────────► Succeeded
//!        │          └─────── Error ── fetch ────► Failed { errors }
//!        │ Queued / InProgress
//!        ├── k == max_attempts ─────────────────► TimedOut
//!        │
//!        └── wait(policy), k += 1 ──► Polling (attempt k + 1)
//!
//!   cancel signal (checked at the top of every iteration) ──► Cancelled
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use mdpack_core_poll::{CancelSignal, PollOutcome, PollPolicy, Poller, StatusSource};
//! use std::time::Duration;
//!
//! # async fn example<S: StatusSource>(source: &S) -> Result<(), Box<dyn std::error::Error>>
//! # where S::Snapshot: std::fmt::Debug {
//! let policy = PollPolicy::fixed(10, Duration::from_secs(5));
//! let poller = Poller::new(policy).with_cancel(CancelSignal::new());
//!
//! match poller.poll(source, "08c000000000001").await? {
//!     PollOutcome::Succeeded(record) => println!("done: {:?}", record),
//!     PollOutcome::Failed { errors, .. } => eprintln!("failed: {}", errors.join("\n")),
//!     PollOutcome::TimedOut(record) => println!("still pending: {:?}", record),
//!     PollOutcome::Cancelled(_) => println!("cancelled"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod error;
pub mod policy;
pub mod poller;

// Re-export main types for convenience
pub use cancel::CancelSignal;
pub use error::PollError;
pub use policy::PollPolicy;
pub use poller::{PollOutcome, PollPhase, PollSnapshot, PollState, Poller, StatusSource};

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use mdpack_core_poll::prelude::*;
/// ```
pub mod prelude {
    pub use super::cancel::CancelSignal;
    pub use super::error::PollError;
    pub use super::policy::PollPolicy;
    pub use super::poller::{PollOutcome, PollPhase, PollSnapshot, Poller, StatusSource};
}
