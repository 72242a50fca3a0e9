//! Package version create requests
//!
//! Version creation runs server-side and is tracked through
//! `Package2VersionCreateRequest` records on the tooling API.

use std::sync::Arc;

use async_trait::async_trait;
use mdpack_core_poll::{PollPhase, PollSnapshot, StatusSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filter::RequestFilter;
use super::request::{fetch_error_messages, format_created_date, RequestStatus, StatusRecord};
use crate::error::{MdpackError, Result};
use crate::gateway::{quote_literal, QueryApi, QueryGateway};

const REQUEST_OBJECT: &str = "Package2VersionCreateRequest";
const ERROR_OBJECT: &str = "Package2VersionCreateRequestError";
const SELECT_FIELDS: &str = "Id, Status, Package2Id, Package2VersionId, \
     Package2Version.SubscriberPackageVersionId, Tag, Branch, CreatedDate";

/// One version create request, normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageVersionCreateRequest {
    pub id: String,
    pub status: RequestStatus,
    pub package2_id: Option<String>,
    pub package2_version_id: Option<String>,
    pub subscriber_package_version_id: Option<String>,
    pub tag: Option<String>,
    pub branch: Option<String>,
    #[serde(rename = "Error")]
    pub errors: Vec<String>,
    pub created_date: Option<String>,
}

impl PollSnapshot for PackageVersionCreateRequest {
    fn phase(&self) -> PollPhase {
        self.status.phase()
    }
}

impl StatusRecord for PackageVersionCreateRequest {
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

/// Record as the platform returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVersionCreateRequest {
    pub id: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub package2_id: Option<String>,
    #[serde(default)]
    pub package2_version_id: Option<String>,
    #[serde(default)]
    pub package2_version: Option<RawPackage2Version>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPackage2Version {
    #[serde(default)]
    pub subscriber_package_version_id: Option<String>,
}

/// Map a platform record to the canonical form
pub fn normalize(raw: RawVersionCreateRequest) -> PackageVersionCreateRequest {
    PackageVersionCreateRequest {
        id: raw.id,
        status: raw.status,
        package2_id: raw.package2_id,
        package2_version_id: raw.package2_version_id,
        subscriber_package_version_id: raw
            .package2_version
            .and_then(|version| version.subscriber_package_version_id),
        tag: raw.tag,
        branch: raw.branch,
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

/// Queries version create requests through a gateway
#[derive(Clone)]
pub struct PackageVersionCreateRequestApi {
    gateway: Arc<dyn QueryGateway>,
}

impl PackageVersionCreateRequestApi {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }

    /// List requests matching a filter, oldest first
    pub async fn list(&self, filter: &RequestFilter) -> Result<Vec<PackageVersionCreateRequest>> {
        self.query(&request_query(&filter.where_clause())).await
    }

    /// Requests with the given id; a lone `Error` record carries its error details
    pub async fn by_id(&self, request_id: &str) -> Result<Vec<PackageVersionCreateRequest>> {
        let mut results = self.query_by_id(request_id).await?;
        if results.len() == 1 && results[0].status() == RequestStatus::Error {
            let record = results.remove(0);
            let errors = self.fetch_errors(record.id()).await?;
            results.push(record.with_errors(errors));
        }
        Ok(results)
    }

    /// Error-detail messages of a failed request, in server order
    pub async fn fetch_errors(&self, request_id: &str) -> Result<Vec<String>> {
        fetch_error_messages(&self.gateway, ERROR_OBJECT, request_id).await
    }

    async fn query_by_id(&self, request_id: &str) -> Result<Vec<PackageVersionCreateRequest>> {
        let where_clause = format!("WHERE Id = {} ", quote_literal(request_id));
        self.query(&request_query(&where_clause)).await
    }

    async fn query(&self, query: &str) -> Result<Vec<PackageVersionCreateRequest>> {
        let raw: Vec<RawVersionCreateRequest> =
            self.gateway.query(QueryApi::Tooling, query).await?.decode()?;
        debug!(count = raw.len(), "Fetched version create requests");
        Ok(raw.into_iter().map(normalize).collect())
    }
}

#[async_trait]
impl StatusSource for PackageVersionCreateRequestApi {
    type Snapshot = PackageVersionCreateRequest;
    type Error = MdpackError;

    async fn fetch_status(&self, request_id: &str) -> Result<PackageVersionCreateRequest> {
        self.query_by_id(request_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MdpackError::RequestNotFound(request_id.to_string()))
    }

    async fn fetch_errors(&self, request_id: &str) -> Result<Vec<String>> {
        PackageVersionCreateRequestApi::fetch_errors(self, request_id).await
    }
}
