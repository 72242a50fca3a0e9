//! Shared pieces of long-running package request records
//!
//! Status values travel as the literal strings `Queued`, `InProgress`,
//! `Success` and `Error`. Case is preserved on the wire; user input is
//! matched ignoring case.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mdpack_core_poll::{PollOutcome, PollPhase, PollSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MdpackError, Result};
use crate::gateway::{quote_literal, QueryApi, QueryGateway};

/// Display format of creation timestamps
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Status of a long-running request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Queued,
    InProgress,
    Success,
    Error,
}

impl RequestStatus {
    /// Every status, in lifecycle order
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Queued,
        RequestStatus::InProgress,
        RequestStatus::Success,
        RequestStatus::Error,
    ];

    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Queued => "Queued",
            RequestStatus::InProgress => "InProgress",
            RequestStatus::Success => "Success",
            RequestStatus::Error => "Error",
        }
    }

    /// Whether no further automatic transition will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Success | RequestStatus::Error)
    }

    /// Poller classification
    pub fn phase(&self) -> PollPhase {
        match self {
            RequestStatus::Queued | RequestStatus::InProgress => PollPhase::Pending,
            RequestStatus::Success => PollPhase::Succeeded,
            RequestStatus::Error => PollPhase::Failed,
        }
    }

    /// Wire spellings joined for messages
    pub fn legal_values() -> String {
        Self::ALL
            .iter()
            .map(RequestStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = MdpackError;

    /// Case-insensitive parse of user input
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                MdpackError::InvalidArgument(format!(
                    "Invalid status '{}'. Please provide one of these statuses: {}",
                    s,
                    RequestStatus::legal_values()
                ))
            })
    }
}

/// Canonical request record the poller and commands work with
pub trait StatusRecord: PollSnapshot + Sized {
    /// Request id
    fn id(&self) -> &str;

    /// Current status
    fn status(&self) -> RequestStatus;

    /// Same record carrying the fetched error details
    fn with_errors(self, errors: Vec<String>) -> Self;
}

/// Format a platform timestamp as `YYYY-MM-DD HH:mm` (UTC)
///
/// Missing values map to `None`; values that do not parse are kept verbatim.
pub fn format_created_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"));

    match parsed {
        Ok(ts) => Some(ts.with_timezone(&Utc).format(CREATED_DATE_FORMAT).to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorDetailRow {
    #[serde(rename = "Message", default)]
    message: Option<String>,
}

/// Fetch error-detail messages for a parent request, in server order
pub async fn fetch_error_messages(
    gateway: &Arc<dyn QueryGateway>,
    error_object: &str,
    parent_request_id: &str,
) -> Result<Vec<String>> {
    let query = format!(
        "SELECT Message FROM {} WHERE ParentRequest.Id = {}",
        error_object,
        quote_literal(parent_request_id)
    );
    let rows: Vec<ErrorDetailRow> = gateway.query(QueryApi::Tooling, &query).await?.decode()?;
    debug!(
        parent_request_id,
        error_count = rows.len(),
        "Fetched request error details"
    );
    Ok(rows
        .into_iter()
        .map(|row| row.message.unwrap_or_default())
        .collect())
}

/// How a command treats a request that is still pending when polling stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMode {
    /// Report the pending record as the result
    Report,
    /// Treat running out of budget as a timeout error
    Wait,
}

/// Turn a poll outcome into a command result
pub fn settle<R: StatusRecord>(
    outcome: PollOutcome<R>,
    request_id: &str,
    max_attempts: u32,
    mode: PendingMode,
) -> Result<R> {
    match outcome {
        PollOutcome::Succeeded(record) => Ok(record),
        PollOutcome::Failed { errors, .. } => Err(MdpackError::RemoteOperation {
            request_id: request_id.to_string(),
            errors,
        }),
        PollOutcome::TimedOut(record) => match mode {
            PendingMode::Report => Ok(record),
            PendingMode::Wait => Err(MdpackError::Timeout {
                request_id: request_id.to_string(),
                attempts: max_attempts,
            }),
        },
        PollOutcome::Cancelled(_) => Err(MdpackError::Cancelled {
            request_id: request_id.to_string(),
        }),
    }
}
