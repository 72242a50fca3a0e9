/*!
 * CLI commands
 *
 * Every command follows the same three steps: `validate` turns raw flags
 * into a checked context without touching the network, `execute` does the
 * work, and `human_success_message` renders the result for a terminal.
 * [`run_command`] drives the steps and prints through an [`OutputWriter`].
 */

pub mod metadata_types;
pub mod org_delete;
pub mod source_name;
pub mod source_path;
pub mod uninstall_report;
pub mod version_create_list;
pub mod version_create_report;

use std::sync::LazyLock;

use async_trait::async_trait;
use mdpack_core_poll::{CancelSignal, PollError, PollPolicy, Poller, StatusSource};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::cli_style::wait_spinner;
use crate::error::{MdpackError, Result};
use crate::output::OutputWriter;
use crate::package::{settle, PendingMode, StatusRecord};

pub use metadata_types::MetadataTypesCommand;
pub use org_delete::{OrgDeleteCommand, OrgDeleteContext, OrgDeleteFlags, OrgDeleteResult};
pub use source_name::{SourceNameCommand, SourceNameFlags, SourceNameResult};
pub use source_path::{SourcePathCommand, SourcePathFlags, SourcePathResult};
pub use uninstall_report::UninstallReportCommand;
pub use version_create_list::VersionCreateListCommand;
pub use version_create_report::{ReportFlags, VersionCreateReportCommand};

/// A CLI command
#[async_trait]
pub trait Command: Send + Sync {
    /// Raw flags as parsed from the command line
    type Flags: Send;
    /// Checked input for `execute`
    type Context: Send;
    /// Result printed on success
    type Output: Serialize + Send;

    /// Check flags; never performs remote calls
    fn validate(&self, flags: Self::Flags) -> Result<Self::Context>;

    async fn execute(&self, context: Self::Context) -> Result<Self::Output>;

    fn human_success_message(&self, output: &Self::Output) -> String;
}

/// Validate, execute and print a command
pub async fn run_command<C: Command>(
    command: &C,
    flags: C::Flags,
    output: &OutputWriter,
) -> Result<C::Output> {
    let context = command.validate(flags)?;
    let result = command.execute(context).await?;
    output.success(&result, &command.human_success_message(&result))?;
    Ok(result)
}

static RECORD_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{15}([a-zA-Z0-9]{3})?$").expect("record id pattern is valid")
});

/// Check a 15- or 18-character record id
pub fn validate_request_id(flag: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if RECORD_ID.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(MdpackError::InvalidArgument(format!(
            "The {} '{}' is not a valid 15 or 18 character id",
            flag, value
        )))
    }
}

/// How a report command polls one request
#[derive(Debug, Clone)]
pub struct PollPlan {
    pub request_id: String,
    pub policy: PollPolicy,
    pub mode: PendingMode,
}

/// Shared wait machinery for report commands
#[derive(Debug, Clone, Default)]
pub struct WaitOptions {
    pub cancel: CancelSignal,
    /// Show a spinner while waiting between queries
    pub spinner: bool,
}

/// Poll a request until it settles and convert the outcome
pub async fn poll_request<Src>(source: &Src, plan: &PollPlan, wait: &WaitOptions) -> Result<Src::Snapshot>
where
    Src: StatusSource<Error = MdpackError> + ?Sized,
    Src::Snapshot: StatusRecord,
{
    let poller = Poller::new(plan.policy.clone()).with_cancel(wait.cancel.clone());
    let spinner = (wait.spinner && plan.policy.max_attempts > 0)
        .then(|| wait_spinner(format!("Waiting for request {}", plan.request_id)));

    let outcome = poller.poll(source, &plan.request_id).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = outcome.map_err(PollError::into_source)?;
    debug!(request_id = %plan.request_id, outcome = outcome.label(), "Poll settled");
    let record = settle(outcome, &plan.request_id, plan.policy.max_attempts, plan.mode)?;
    debug!(request_id = record.id(), status = %record.status(), "Reporting request");
    Ok(record)
}
