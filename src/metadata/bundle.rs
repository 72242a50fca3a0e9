//! Resolver for bundle types
//!
//! A bundle is a directory named after the entity. Files inside it are named
//! freely (`WidgetController.js`, `WidgetHelper.js`, `Widget.css`), so the
//! entity name comes from the directory, not from a file name.

use std::path::{Path, PathBuf};

use super::registry::MetadataTypeRegistry;
use super::resolver::{
    after_type_directory, path_components, strip_type_extension, FileProperty,
    MetadataPathResolver,
};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct BundleMetadataType<'r> {
    registry: &'r MetadataTypeRegistry,
    type_name: String,
}

impl<'r> BundleMetadataType<'r> {
    pub fn new(registry: &'r MetadataTypeRegistry, type_name: impl Into<String>) -> Self {
        Self {
            registry,
            type_name: type_name.into(),
        }
    }
}

impl MetadataPathResolver for BundleMetadataType<'_> {
    fn registry(&self) -> &MetadataTypeRegistry {
        self.registry
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn resolve_source_path(&self, full_name: &str, root_source_dir: &Path) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(root_source_dir
            .join(&descriptor.default_directory)
            .join(full_name))
    }

    fn resolve_source_metadata_path(
        &self,
        full_name: &str,
        root_source_dir: &Path,
    ) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(root_source_dir
            .join(&descriptor.default_directory)
            .join(full_name)
            .join(descriptor.metadata_file_name(full_name)))
    }

    fn resolve_mdapi_path(&self, full_name: &str, mdapi_root_dir: &Path) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(mdapi_root_dir
            .join(&descriptor.default_directory)
            .join(full_name))
    }

    fn extract_aggregate_name(
        &self,
        file_property: &FileProperty,
        _namespace: Option<&str>,
    ) -> Result<String> {
        let descriptor = self.descriptor()?;
        let components = path_components(&file_property.file_name);
        let rest = after_type_directory(&components, &descriptor.default_directory);

        let name = match rest.as_slice() {
            [] => "",
            // A lone component is the bundle directory itself, or a file without one
            [only] => strip_type_extension(*only, descriptor, self.registry),
            [bundle, ..] => *bundle,
        };
        Ok(name.to_string())
    }
}
