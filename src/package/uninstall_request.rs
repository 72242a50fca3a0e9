//! Package uninstall requests
//!
//! Uninstalling a package version from a subscriber org is asynchronous on
//! the platform side and is tracked through
//! `SubscriberPackageVersionUninstallRequest` records.

use std::sync::Arc;

use async_trait::async_trait;
use mdpack_core_poll::{PollPhase, PollSnapshot, StatusSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::request::{fetch_error_messages, format_created_date, RequestStatus, StatusRecord};
use crate::error::{MdpackError, Result};
use crate::gateway::{quote_literal, QueryApi, QueryGateway};

const REQUEST_OBJECT: &str = "SubscriberPackageVersionUninstallRequest";
const ERROR_OBJECT: &str = "PackageVersionUninstallRequestError";
const SELECT_FIELDS: &str = "Id, Status, SubscriberPackageVersionId, CreatedDate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageUninstallRequest {
    pub id: String,
    pub status: RequestStatus,
    pub subscriber_package_version_id: Option<String>,
    #[serde(rename = "Error")]
    pub errors: Vec<String>,
    pub created_date: Option<String>,
}

impl PollSnapshot for PackageUninstallRequest {
    fn phase(&self) -> PollPhase {
        self.status.phase()
    }
}

impl StatusRecord for PackageUninstallRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawUninstallRequest {
    pub id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub subscriber_package_version_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

pub fn normalize(raw: RawUninstallRequest) -> PackageUninstallRequest {
    PackageUninstallRequest {
        id: raw.id,
        status: raw.status,
        subscriber_package_version_id: raw.subscriber_package_version_id,
        errors: Vec::new(),
        created_date: format_created_date(raw.created_date.as_deref()),
    }
}

fn request_query(where_clause: &str) -> String {
    format!(
        "SELECT {} FROM {} {}ORDER BY CreatedDate",
        SELECT_FIELDS, REQUEST_OBJECT, where_clause
    )
}

/// Queries uninstall requests through a gateway
#[derive(Clone)]
pub struct PackageUninstallRequestApi {
    gateway: Arc<dyn QueryGateway>,
}

impl PackageUninstallRequestApi {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }

    pub async fn fetch_errors(&self, request_id: &str) -> Result<Vec<String>> {
        fetch_error_messages(&self.gateway, ERROR_OBJECT, request_id).await
    }

    async fn query_by_id(&self, request_id: &str) -> Result<Vec<PackageUninstallRequest>> {
        let where_clause = format!("WHERE Id = {} ", quote_literal(request_id));
        self.query(&request_query(&where_clause)).await
    }

    async fn query(&self, query: &str) -> Result<Vec<PackageUninstallRequest>> {
        let raw: Vec<RawUninstallRequest> =
            self.gateway.query(QueryApi::Tooling, query).await?.decode()?;
        debug!(count = raw.len(), "Fetched uninstall requests");
        Ok(raw.into_iter().map(normalize).collect())
    }
}

#[async_trait]
impl StatusSource for PackageUninstallRequestApi {
    type Snapshot = PackageUninstallRequest;
    type Error = MdpackError;

    async fn fetch_status(&self, request_id: &str) -> Result<PackageUninstallRequest> {
        self.query_by_id(request_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MdpackError::RequestNotFound(request_id.to_string()))
    }

    async fn fetch_errors(&self, request_id: &str) -> Result<Vec<String>> {
        PackageUninstallRequestApi::fetch_errors(self, request_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize() {
        let raw: RawUninstallRequest = serde_json::from_value(json!({
            "Id": "06y000000000001AAA",
            "Status": "InProgress",
            "SubscriberPackageVersionId": "04t000000000001",
            "CreatedDate": "2019-01-02T03:04:05.000+0000"
        }))
        .unwrap();
        let record = normalize(raw);

        assert_eq!(record.status, RequestStatus::InProgress);
        assert_eq!(record.phase(), PollPhase::Pending);
        assert_eq!(record.created_date.as_deref(), Some("2019-01-02 03:04"));
        assert!(record.errors.is_empty());
    }

    #[test]
    fn test_request_query_targets_uninstall_object() {
        let query = request_query("WHERE Id = '06y' ");
        assert!(query.starts_with("SELECT Id, Status, SubscriberPackageVersionId, CreatedDate"));
        assert!(query.contains("FROM SubscriberPackageVersionUninstallRequest WHERE Id = '06y' "));
        assert!(query.ends_with("ORDER BY CreatedDate"));
    }
}
