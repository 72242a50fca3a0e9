//! `package version create report`
//!
//! Without `--wait` the request is looked up once and reported in whatever
//! state it is in. With `--wait` the command keeps polling and a request
//! still pending at the end of the window is a timeout.

use async_trait::async_trait;

use super::{poll_request, validate_request_id, Command, PollPlan, WaitOptions};
use crate::cli_style::{key_value_table, optional};
use crate::config::PollSettings;
use crate::error::Result;
use crate::package::{PackageVersionCreateRequest, PackageVersionCreateRequestApi, PendingMode};

/// Flags shared by report commands
#[derive(Debug, Clone, Default)]
pub struct ReportFlags {
    pub request_id: String,
    /// Minutes to wait for a terminal status
    pub wait_minutes: Option<u64>,
}

impl ReportFlags {
    /// Turn flags into a poll plan
    pub fn plan(&self, settings: &PollSettings) -> Result<PollPlan> {
        let request_id = validate_request_id("request id", &self.request_id)?;
        let plan = match self.wait_minutes {
            Some(minutes) => PollPlan {
                request_id,
                policy: settings.wait_policy(minutes),
                mode: PendingMode::Wait,
            },
            None => PollPlan {
                request_id,
                policy: settings.report_policy(),
                mode: PendingMode::Report,
            },
        };
        Ok(plan)
    }
}

pub struct VersionCreateReportCommand {
    api: PackageVersionCreateRequestApi,
    settings: PollSettings,
    wait: WaitOptions,
}

impl VersionCreateReportCommand {
    pub fn new(api: PackageVersionCreateRequestApi, settings: PollSettings, wait: WaitOptions) -> Self {
        Self { api, settings, wait }
    }
}

#[async_trait]
impl Command for VersionCreateReportCommand {
    type Flags = ReportFlags;
    type Context = PollPlan;
    type Output = PackageVersionCreateRequest;

    fn validate(&self, flags: ReportFlags) -> Result<PollPlan> {
        flags.plan(&self.settings)
    }

    async fn execute(&self, plan: PollPlan) -> Result<PackageVersionCreateRequest> {
        poll_request(&self.api, &plan, &self.wait).await
    }

    fn human_success_message(&self, request: &PackageVersionCreateRequest) -> String {
        let table = key_value_table(&[
            ("Version Create Request Id", request.id.clone()),
            ("Status", request.status.to_string()),
            ("Package Id", optional(request.package2_id.as_deref())),
            ("Package Version Id", optional(request.package2_version_id.as_deref())),
            (
                "Subscriber Package Version Id",
                optional(request.subscriber_package_version_id.as_deref()),
            ),
            ("Tag", optional(request.tag.as_deref())),
            ("Branch", optional(request.branch.as_deref())),
            ("Created Date", optional(request.created_date.as_deref())),
        ]);
        format!("=== Package Version Create Request\n{}", table)
    }
}
