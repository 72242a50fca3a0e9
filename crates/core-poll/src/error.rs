//! Error types for poll sessions
//!
//! Terminal outcomes (failure, timeout, cancellation) are *not* errors here;
//! they are [`crate::PollOutcome`] variants. A [`PollError`] means the status
//! source itself could not answer, which aborts the session.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Status query for request {request_id} failed: {source}")]
    Status {
        request_id: String,
        #[source]
        source: E,
    },

    #[error("Error-detail query for request {request_id} failed: {source}")]
    ErrorDetails {
        request_id: String,
        #[source]
        source: E,
    },
}

impl<E> PollError<E>
where
    E: std::error::Error + 'static,
{
    /// Request id the failing query was issued for
    pub fn request_id(&self) -> &str {
        match self {
            PollError::Status { request_id, .. } | PollError::ErrorDetails { request_id, .. } => {
                request_id
            }
        }
    }

    /// Unwrap the status source's own error
    pub fn into_source(self) -> E {
        match self {
            PollError::Status { source, .. } | PollError::ErrorDetails { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_includes_request_id() {
        let err: PollError<io::Error> = PollError::Status {
            request_id: "08c000000000001".to_string(),
            source: io::Error::other("connection reset"),
        };
        assert_eq!(
            err.to_string(),
            "Status query for request 08c000000000001 failed: connection reset"
        );
        assert_eq!(err.request_id(), "08c000000000001");
    }

    #[test]
    fn test_into_source() {
        let err: PollError<io::Error> = PollError::ErrorDetails {
            request_id: "x".to_string(),
            source: io::Error::new(io::ErrorKind::TimedOut, "slow"),
        };
        assert_eq!(err.into_source().kind(), io::ErrorKind::TimedOut);
    }
}
