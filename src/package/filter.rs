//! Filters for listing long-running requests

use serde::{Deserialize, Serialize};

use super::request::RequestStatus;
use crate::error::{MdpackError, Result};

/// Raw listing options, as supplied on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Only requests created within the last N days (0 = today)
    pub created_last_days: Option<String>,

    /// Only requests in this status (any case)
    pub status: Option<String>,
}

/// AND-combined query predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    predicates: Vec<String>,
}

impl RequestFilter {
    /// Filter that matches everything
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// Predicates in the order they were added
    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn is_unconstrained(&self) -> bool {
        self.predicates.is_empty()
    }

    /// `WHERE a AND b ` (with trailing space), or empty when unconstrained
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", self.predicates.join(" AND "))
        }
    }
}

/// Validate listing options and build the filter
///
/// Fails with `InvalidArgument` before any query is issued.
pub fn build_filter(options: &ListOptions) -> Result<RequestFilter> {
    let mut predicates = Vec::new();

    if let Some(raw) = options.created_last_days.as_deref() {
        let days = parse_days(raw)?;
        predicates.push(format!("CreatedDate = LAST_N_DAYS:{}", days));
    }

    if let Some(raw) = options.status.as_deref() {
        let status: RequestStatus = raw.parse()?;
        predicates.push(format!("Status = '{}'", status.as_str()));
    }

    Ok(RequestFilter { predicates })
}

fn parse_days(raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|_| {
        MdpackError::InvalidArgument(format!(
            "Invalid value '{}' for createdlastdays. Provide a whole number of days greater than or equal to 0",
            raw
        ))
    })
}
