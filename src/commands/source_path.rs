//! `source path`: where an entity lives in the source and mdapi trees

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::Command;
use crate::cli_style::key_value_table;
use crate::error::{MdpackError, Result};
use crate::metadata::MetadataTypeRegistry;

pub const DEFAULT_SOURCE_ROOT: &str = "force-app/main/default";
pub const DEFAULT_MDAPI_ROOT: &str = "mdapi";

#[derive(Debug, Clone)]
pub struct SourcePathFlags {
    pub type_name: String,
    pub full_name: String,
    pub source_root: PathBuf,
    pub mdapi_root: PathBuf,
}

impl Default for SourcePathFlags {
    fn default() -> Self {
        Self {
            type_name: String::new(),
            full_name: String::new(),
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            mdapi_root: PathBuf::from(DEFAULT_MDAPI_ROOT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePathResult {
    pub type_name: String,
    pub full_name: String,
    pub source_path: PathBuf,
    pub source_metadata_path: PathBuf,
    pub mdapi_path: PathBuf,
}

pub struct SourcePathCommand {
    registry: Arc<MetadataTypeRegistry>,
}

impl SourcePathCommand {
    pub fn new(registry: Arc<MetadataTypeRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Command for SourcePathCommand {
    type Flags = SourcePathFlags;
    type Context = SourcePathFlags;
    type Output = SourcePathResult;

    fn validate(&self, mut flags: SourcePathFlags) -> Result<SourcePathFlags> {
        flags.full_name = flags.full_name.trim().to_string();
        if flags.full_name.is_empty() {
            return Err(MdpackError::InvalidArgument(
                "An entity name is required".to_string(),
            ));
        }
        // Canonical spelling, and an early UnknownMetadataType
        flags.type_name = self.registry.get(&flags.type_name)?.name.clone();
        Ok(flags)
    }

    async fn execute(&self, flags: SourcePathFlags) -> Result<SourcePathResult> {
        let resolver = self.registry.resolver(&flags.type_name)?;
        Ok(SourcePathResult {
            source_path: resolver.resolve_source_path(&flags.full_name, &flags.source_root)?,
            source_metadata_path: resolver
                .resolve_source_metadata_path(&flags.full_name, &flags.source_root)?,
            mdapi_path: resolver.resolve_mdapi_path(&flags.full_name, &flags.mdapi_root)?,
            type_name: flags.type_name,
            full_name: flags.full_name,
        })
    }

    fn human_success_message(&self, result: &SourcePathResult) -> String {
        key_value_table(&[
            ("Type", result.type_name.clone()),
            ("Name", result.full_name.clone()),
            ("Source", result.source_path.display().to_string()),
            ("Source Metadata", result.source_metadata_path.display().to_string()),
            ("Mdapi", result.mdapi_path.display().to_string()),
        ])
        .to_string()
    }
}
