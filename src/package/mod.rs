//! Long-running package requests
//!
//! Each request kind maps platform records onto a canonical record and
//! implements [`StatusSource`](mdpack_core_poll::StatusSource) so the poller
//! can drive it.

pub mod filter;
pub mod request;
pub mod uninstall_request;
pub mod version_create_request;

pub use filter::{build_filter, ListOptions, RequestFilter};
pub use request::{
    format_created_date, settle, PendingMode, RequestStatus, StatusRecord, CREATED_DATE_FORMAT,
};
pub use uninstall_request::{PackageUninstallRequest, PackageUninstallRequestApi};
pub use version_create_request::{PackageVersionCreateRequest, PackageVersionCreateRequestApi};
