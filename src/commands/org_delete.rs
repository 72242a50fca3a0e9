//! `org delete`
//!
//! Marks a scratch org for deletion on its dev hub and removes the local
//! org configuration. An org that already expired is not an error: only the
//! local configuration is removed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::Command;
use crate::error::{MdpackError, Result};
use crate::gateway::GatewayConnector;
use crate::org::{ActiveScratchOrgDeleteApi, OrgConfig, OrgConfigStore, ScratchOrgDeletion};

#[derive(Debug, Clone, Default)]
pub struct OrgDeleteFlags {
    pub target_username: Option<String>,
    pub devhub_username: Option<String>,
}

/// Validated orgs for a delete
#[derive(Debug, Clone)]
pub struct OrgDeleteContext {
    pub scratch_org: OrgConfig,
    pub dev_hub: OrgConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDeleteResult {
    pub org_id: String,
    pub username: String,
    pub deletion: ScratchOrgDeletion,
}

pub struct OrgDeleteCommand {
    store: Arc<dyn OrgConfigStore>,
    connector: Arc<dyn GatewayConnector>,
    default_username: Option<String>,
    default_devhub_username: Option<String>,
}

impl OrgDeleteCommand {
    pub fn new(store: Arc<dyn OrgConfigStore>, connector: Arc<dyn GatewayConnector>) -> Self {
        Self {
            store,
            connector,
            default_username: None,
            default_devhub_username: None,
        }
    }

    /// Usernames used when the flags leave them out
    pub fn with_defaults(
        mut self,
        default_username: Option<String>,
        default_devhub_username: Option<String>,
    ) -> Self {
        self.default_username = default_username;
        self.default_devhub_username = default_devhub_username;
        self
    }
}

#[async_trait]
impl Command for OrgDeleteCommand {
    type Flags = OrgDeleteFlags;
    type Context = OrgDeleteContext;
    type Output = OrgDeleteResult;

    fn validate(&self, flags: OrgDeleteFlags) -> Result<OrgDeleteContext> {
        let username = flags
            .target_username
            .or_else(|| self.default_username.clone())
            .ok_or_else(|| {
                MdpackError::InvalidArgument(
                    "No target org specified; pass --target-username or set default_username"
                        .to_string(),
                )
            })?;
        let scratch_org = self.store.load(&username)?;

        let devhub_username = flags
            .devhub_username
            .or_else(|| scratch_org.dev_hub_username.clone())
            .or_else(|| self.default_devhub_username.clone())
            .ok_or_else(|| {
                MdpackError::InvalidArgument(format!(
                    "No dev hub known for {}; pass --target-devhub-username",
                    username
                ))
            })?;
        let dev_hub = self.store.load(&devhub_username)?;

        Ok(OrgDeleteContext {
            scratch_org,
            dev_hub,
        })
    }

    async fn execute(&self, context: OrgDeleteContext) -> Result<OrgDeleteResult> {
        let gateway = self.connector.connect(&context.dev_hub)?;
        let deletion = ActiveScratchOrgDeleteApi::new(gateway)
            .delete(&context.scratch_org.org_id)
            .await?;

        self.store.remove(&context.scratch_org.username)?;
        info!(
            username = %context.scratch_org.username,
            ?deletion,
            "Removed scratch org"
        );

        Ok(OrgDeleteResult {
            org_id: context.scratch_org.org_id,
            username: context.scratch_org.username,
            deletion,
        })
    }

    fn human_success_message(&self, result: &OrgDeleteResult) -> String {
        match result.deletion {
            ScratchOrgDeletion::Deleted => format!(
                "Successfully marked scratch org {} for deletion",
                result.username
            ),
            ScratchOrgDeletion::AlreadyDeleted => format!(
                "Scratch org {} was already deleted or expired; removed its local configuration",
                result.username
            ),
        }
    }
}
