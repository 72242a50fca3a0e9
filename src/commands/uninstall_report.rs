//! `package uninstall report`

use async_trait::async_trait;

use super::version_create_report::ReportFlags;
use super::{poll_request, Command, PollPlan, WaitOptions};
use crate::config::PollSettings;
use crate::error::Result;
use crate::package::{PackageUninstallRequest, PackageUninstallRequestApi, RequestStatus};

pub struct UninstallReportCommand {
    api: PackageUninstallRequestApi,
    settings: PollSettings,
    wait: WaitOptions,
}

impl UninstallReportCommand {
    pub fn new(api: PackageUninstallRequestApi, settings: PollSettings, wait: WaitOptions) -> Self {
        Self { api, settings, wait }
    }
}

#[async_trait]
impl Command for UninstallReportCommand {
    type Flags = ReportFlags;
    type Context = PollPlan;
    type Output = PackageUninstallRequest;

    fn validate(&self, flags: ReportFlags) -> Result<PollPlan> {
        flags.plan(&self.settings)
    }

    async fn execute(&self, plan: PollPlan) -> Result<PackageUninstallRequest> {
        poll_request(&self.api, &plan, &self.wait).await
    }

    fn human_success_message(&self, request: &PackageUninstallRequest) -> String {
        let version = request
            .subscriber_package_version_id
            .as_deref()
            .unwrap_or("the package version");
        match request.status {
            RequestStatus::Success => format!("Successfully uninstalled {}", version),
            // Failed requests surface as errors before reaching here
            _ => format!(
                "Uninstall request {} is {}. Run \"mdpack package uninstall report -i {}\" to check again",
                request.id, request.status, request.id
            ),
        }
    }
}
