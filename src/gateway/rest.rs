//! HTTP transport for the query gateway
//!
//! Talks to the platform REST endpoints with an access token obtained
//! elsewhere. No login flow lives here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use super::{GatewayConnector, GatewayError, QueryApi, QueryGateway, QueryResult};
use crate::org::OrgConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// One page of a query response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryPage {
    #[serde(default)]
    records: Option<Vec<Value>>,
    #[serde(default = "default_done")]
    done: bool,
    #[serde(default)]
    next_records_url: Option<String>,
}

fn default_done() -> bool {
    true
}

/// Error entry in a platform error response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteErrorBody {
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    message: String,
}

/// Query gateway backed by the platform REST API
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl RestGateway {
    /// Create a gateway for an instance URL and access token
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mdpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: api_version.into(),
        })
    }

    /// Create a gateway from a stored org configuration
    pub fn for_org(org: &OrgConfig, api_version: &str) -> Result<Self, GatewayError> {
        Self::new(&org.instance_url, &org.access_token, api_version)
    }

    fn data_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}/{}",
            self.instance_url, self.api_version, path
        )
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Err(remote_error(status.as_u16(), &body))
    }

    async fn fetch_page(&self, url: &str, query: Option<&str>) -> Result<QueryPage, GatewayError> {
        let mut request = self.client.get(url);
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }
        let response = self.send(request).await?;
        response
            .json::<QueryPage>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QueryGateway for RestGateway {
    async fn query(&self, api: QueryApi, query: &str) -> Result<QueryResult, GatewayError> {
        let endpoint = match api {
            QueryApi::Data => self.data_url("query"),
            QueryApi::Tooling => self.data_url("tooling/query"),
        };
        debug!(?api, query, "Running remote query");

        let mut page = self.fetch_page(&endpoint, Some(query)).await?;
        let mut records = page.records.take();

        while !page.done {
            let Some(next) = page.next_records_url.take() else {
                break;
            };
            trace!(next = %next, "Fetching next query page");
            page = self
                .fetch_page(&format!("{}{}", self.instance_url, next), None)
                .await?;
            if let Some(more) = page.records.take() {
                records.get_or_insert_with(Vec::new).extend(more);
            }
        }

        Ok(QueryResult { records })
    }

    async fn delete_record(&self, sobject: &str, id: &str) -> Result<(), GatewayError> {
        let url = self.data_url(&format!("sobjects/{}/{}", sobject, id));
        debug!(sobject, id, "Deleting remote record");
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

/// Connects stored orgs through [`RestGateway`]
#[derive(Debug, Clone)]
pub struct RestConnector {
    api_version: String,
}

impl RestConnector {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
        }
    }
}

impl GatewayConnector for RestConnector {
    fn connect(&self, org: &OrgConfig) -> Result<Arc<dyn QueryGateway>, GatewayError> {
        Ok(Arc::new(RestGateway::for_org(org, &self.api_version)?))
    }
}

/// Map a non-success HTTP response body to a gateway error
fn remote_error(status: u16, body: &str) -> GatewayError {
    match serde_json::from_str::<Vec<RemoteErrorBody>>(body) {
        Ok(entries) if !entries.is_empty() => {
            let first = &entries[0];
            GatewayError::Remote {
                error_code: first.error_code.clone(),
                message: first.message.clone(),
            }
        }
        _ => GatewayError::Remote {
            error_code: format!("HTTP_{}", status),
            message: body.trim().to_string(),
        },
    }
}
