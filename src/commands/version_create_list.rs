//! `package version create list`

use async_trait::async_trait;
use comfy_table::Cell;

use super::Command;
use crate::cli_style::{optional, record_table, status_cell};
use crate::error::Result;
use crate::package::{
    build_filter, ListOptions, PackageVersionCreateRequest, PackageVersionCreateRequestApi,
    RequestFilter,
};

pub struct VersionCreateListCommand {
    api: PackageVersionCreateRequestApi,
}

impl VersionCreateListCommand {
    pub fn new(api: PackageVersionCreateRequestApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Command for VersionCreateListCommand {
    type Flags = ListOptions;
    type Context = RequestFilter;
    type Output = Vec<PackageVersionCreateRequest>;

    fn validate(&self, flags: ListOptions) -> Result<RequestFilter> {
        build_filter(&flags)
    }

    async fn execute(&self, filter: RequestFilter) -> Result<Vec<PackageVersionCreateRequest>> {
        self.api.list(&filter).await
    }

    fn human_success_message(&self, requests: &Vec<PackageVersionCreateRequest>) -> String {
        if requests.is_empty() {
            return "No results found".to_string();
        }

        let mut table = record_table(&[
            "Id",
            "Status",
            "Package2 Id",
            "Package2 Version Id",
            "Subscriber Package Version Id",
            "Tag",
            "Branch",
            "Created Date",
        ]);
        for request in requests {
            table.add_row(vec![
                Cell::new(&request.id),
                status_cell(request.status),
                Cell::new(optional(request.package2_id.as_deref())),
                Cell::new(optional(request.package2_version_id.as_deref())),
                Cell::new(optional(request.subscriber_package_version_id.as_deref())),
                Cell::new(optional(request.tag.as_deref())),
                Cell::new(optional(request.branch.as_deref())),
                Cell::new(optional(request.created_date.as_deref())),
            ]);
        }
        format!(
            "=== Package Version Create Requests [{}]\n{}",
            requests.len(),
            table
        )
    }
}
