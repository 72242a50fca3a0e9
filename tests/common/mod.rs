//! In-memory gateway shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mdpack::gateway::{GatewayConnector, GatewayError, QueryApi, QueryGateway, QueryResult};
use mdpack::org::OrgConfig;
use serde_json::{json, Value};

type Reply = Result<QueryResult, GatewayError>;

struct Rule {
    needle: String,
    replies: VecDeque<Reply>,
}

/// Answers queries by substring match; the last reply of a rule repeats
#[derive(Default)]
pub struct MockGateway {
    rules: Mutex<Vec<Rule>>,
    queries: Mutex<Vec<(QueryApi, String)>>,
    deletes: Mutex<Vec<(String, String)>>,
    delete_error: Mutex<Option<GatewayError>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue replies for queries containing `needle`
    pub fn on(&self, needle: &str, replies: Vec<Reply>) -> &Self {
        self.rules.lock().unwrap().push(Rule {
            needle: needle.to_string(),
            replies: replies.into(),
        });
        self
    }

    pub fn fail_deletes_with(&self, error: GatewayError) {
        *self.delete_error.lock().unwrap() = Some(error);
    }

    pub fn queries(&self) -> Vec<(QueryApi, String)> {
        self.queries.lock().unwrap().clone()
    }

    /// Queries containing `needle`
    pub fn queries_matching(&self, needle: &str) -> Vec<String> {
        self.queries()
            .into_iter()
            .filter(|(_, q)| q.contains(needle))
            .map(|(_, q)| q)
            .collect()
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryGateway for MockGateway {
    async fn query(&self, api: QueryApi, query: &str) -> Result<QueryResult, GatewayError> {
        self.queries.lock().unwrap().push((api, query.to_string()));

        let mut rules = self.rules.lock().unwrap();
        let Some(rule) = rules.iter_mut().find(|rule| query.contains(&rule.needle)) else {
            return Ok(QueryResult::empty());
        };
        if rule.replies.len() > 1 {
            rule.replies.pop_front().unwrap()
        } else {
            rule.replies
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(QueryResult::empty()))
        }
    }

    async fn delete_record(&self, sobject: &str, id: &str) -> Result<(), GatewayError> {
        self.deletes
            .lock()
            .unwrap()
            .push((sobject.to_string(), id.to_string()));
        match self.delete_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Hands out the same mock for every org and remembers who asked
pub struct MockConnector {
    pub gateway: Arc<MockGateway>,
    pub connected: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(gateway: Arc<MockGateway>) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            connected: Mutex::new(Vec::new()),
        })
    }
}

impl GatewayConnector for MockConnector {
    fn connect(&self, org: &OrgConfig) -> Result<Arc<dyn QueryGateway>, GatewayError> {
        self.connected.lock().unwrap().push(org.username.clone());
        let gateway: Arc<dyn QueryGateway> = self.gateway.clone();
        Ok(gateway)
    }
}

pub fn records(values: Vec<Value>) -> Reply {
    Ok(QueryResult::from_records(values))
}

pub fn version_request(id: &str, status: &str) -> Value {
    json!({
        "Id": id,
        "Status": status,
        "Package2Id": "0Ho000000000001AAA",
        "Package2VersionId": null,
        "Package2Version": null,
        "Tag": null,
        "Branch": null,
        "CreatedDate": "2018-06-20T17:39:52.000+0000"
    })
}

pub fn uninstall_request(id: &str, status: &str) -> Value {
    json!({
        "Id": id,
        "Status": status,
        "SubscriberPackageVersionId": "04t000000000001AAA",
        "CreatedDate": "2019-01-02T03:04:05.000+0000"
    })
}

pub fn messages(texts: &[&str]) -> Reply {
    records(texts.iter().map(|t| json!({ "Message": t })).collect())
}
