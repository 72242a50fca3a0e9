//! Deleting scratch orgs through their dev hub
//!
//! A scratch org is deleted by removing its `ActiveScratchOrg` record from
//! the dev hub. An org that has already expired or been deleted has no such
//! record; that case is a successful no-op.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::gateway::{quote_literal, GatewayError, QueryApi, QueryGateway};

const ACTIVE_SCRATCH_ORG: &str = "ActiveScratchOrg";

/// Result of a delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScratchOrgDeletion {
    /// The active scratch org record was removed
    Deleted,
    /// The org had already expired or been deleted
    AlreadyDeleted,
}

#[derive(Debug, Deserialize)]
struct ActiveScratchOrgRow {
    #[serde(rename = "Id")]
    id: String,
}

/// The dev hub tracks scratch orgs by their 15-character org id
pub fn short_org_id(org_id: &str) -> &str {
    match org_id.char_indices().nth(15) {
        Some((idx, _)) => &org_id[..idx],
        None => org_id,
    }
}

/// Deletes scratch orgs on a dev hub
#[derive(Clone)]
pub struct ActiveScratchOrgDeleteApi {
    dev_hub: Arc<dyn QueryGateway>,
}

impl ActiveScratchOrgDeleteApi {
    pub fn new(dev_hub: Arc<dyn QueryGateway>) -> Self {
        Self { dev_hub }
    }

    /// Delete the scratch org with `org_id`
    ///
    /// A missing record, or a delete rejected because the record is already
    /// gone, is `AlreadyDeleted`. Other errors propagate, including
    /// insufficient access on the dev hub.
    pub async fn delete(&self, org_id: &str) -> Result<ScratchOrgDeletion> {
        let short_id = short_org_id(org_id);
        let query = format!(
            "SELECT Id FROM {} WHERE ScratchOrg = {}",
            ACTIVE_SCRATCH_ORG,
            quote_literal(short_id)
        );
        let rows: Vec<ActiveScratchOrgRow> =
            self.dev_hub.query(QueryApi::Data, &query).await?.decode()?;

        let Some(row) = rows.into_iter().next() else {
            debug!(org_id = short_id, "No active scratch org record");
            return Ok(ScratchOrgDeletion::AlreadyDeleted);
        };

        match self.dev_hub.delete_record(ACTIVE_SCRATCH_ORG, &row.id).await {
            Ok(()) => {
                info!(org_id = short_id, record_id = %row.id, "Deleted active scratch org");
                Ok(ScratchOrgDeletion::Deleted)
            }
            Err(e) if is_already_deleted(&e) => {
                info!(
                    org_id = short_id,
                    error_code = e.error_code().unwrap_or_default(),
                    "Active scratch org record already gone"
                );
                Ok(ScratchOrgDeletion::AlreadyDeleted)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Remote error codes meaning the record disappeared between query and delete
const ALREADY_DELETED_CODES: &[&str] = &[
    "ENTITY_IS_DELETED",
    "NOT_FOUND",
    "INVALID_CROSS_REFERENCE_KEY",
];

fn is_already_deleted(error: &GatewayError) -> bool {
    error
        .error_code()
        .is_some_and(|code| ALREADY_DELETED_CODES.contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_deleted_codes() {
        let remote = |code: &str| GatewayError::Remote {
            error_code: code.to_string(),
            message: "gone".to_string(),
        };
        assert!(is_already_deleted(&remote("ENTITY_IS_DELETED")));
        assert!(is_already_deleted(&remote("NOT_FOUND")));
        assert!(is_already_deleted(&remote("INVALID_CROSS_REFERENCE_KEY")));
        assert!(!is_already_deleted(&remote("INSUFFICIENT_ACCESS_OR_READONLY")));
        assert!(!is_already_deleted(&GatewayError::Transport("reset".to_string())));
    }

    #[test]
    fn test_short_org_id() {
        assert_eq!(short_org_id("00D000000000001AAA"), "00D000000000001");
        assert_eq!(short_org_id("00D000000000001"), "00D000000000001");
        assert_eq!(short_org_id("00D1"), "00D1");
    }
}
