//! Authorized orgs and scratch org lifecycle

pub mod config_store;
pub mod scratch_org;

pub use config_store::{FileOrgConfigStore, OrgConfig, OrgConfigStore};
pub use scratch_org::{short_org_id, ActiveScratchOrgDeleteApi, ScratchOrgDeletion};
