//! Record query gateway
//!
//! The remote platform is treated as an opaque data source: a query string
//! goes in, raw JSON records come out. Everything that talks to the platform
//! does so through [`QueryGateway`] so commands can be exercised against
//! in-memory fakes.

pub mod rest;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub use rest::{RestConnector, RestGateway};

use crate::org::OrgConfig;

/// Which query endpoint a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryApi {
    /// Regular data API
    Data,
    /// Tooling API (packaging objects live here)
    Tooling,
}

/// Result of one query
///
/// An absent or empty `records` list means zero results, never an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub records: Option<Vec<Value>>,
}

impl QueryResult {
    /// Wrap a list of raw records
    pub fn from_records(records: Vec<Value>) -> Self {
        Self {
            records: Some(records),
        }
    }

    /// Query result with no `records` field at all
    pub fn empty() -> Self {
        Self { records: None }
    }

    /// Raw records, treating absence as empty
    pub fn into_records(self) -> Vec<Value> {
        self.records.unwrap_or_default()
    }

    /// Decode each raw record into `T`
    pub fn decode<T: DeserializeOwned>(self) -> Result<Vec<T>, GatewayError> {
        self.into_records()
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| GatewayError::Decode(e.to_string()))
            })
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote API error ({error_code}): {message}")]
    Remote { error_code: String, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Remote error classification code, if the platform supplied one
    pub fn error_code(&self) -> Option<&str> {
        match self {
            GatewayError::Remote { error_code, .. } => Some(error_code),
            _ => None,
        }
    }
}

/// Executes queries and record deletions against the remote platform
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Run a query and return its records
    async fn query(&self, api: QueryApi, query: &str) -> Result<QueryResult, GatewayError>;

    /// Delete one record by object name and id
    async fn delete_record(&self, sobject: &str, id: &str) -> Result<(), GatewayError>;
}

/// Opens a gateway for a stored org
pub trait GatewayConnector: Send + Sync {
    fn connect(&self, org: &OrgConfig) -> Result<Arc<dyn QueryGateway>, GatewayError>;
}

/// Quote a value as a query string literal
pub fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
