//! Resolver for types stored one directory deeper than the flat layout
//!
//! Territory models are the canonical case: every model lives in its own
//! directory, and the source tree keeps `<name>.<ext>` plus the global
//! metadata file suffix inside it.
//!
//! ```text
//! source:  <root>/territory2Models/Global/Global.territory2Model-meta.xml
//! mdapi:   <root>/territory2Models/Global/Global.territory2Model
//! ```

use std::path::{Path, PathBuf};

use super::registry::MetadataTypeRegistry;
use super::resolver::MetadataPathResolver;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct NestedAggregateMetadataType<'r> {
    registry: &'r MetadataTypeRegistry,
    type_name: String,
}

impl<'r> NestedAggregateMetadataType<'r> {
    pub fn new(registry: &'r MetadataTypeRegistry, type_name: impl Into<String>) -> Self {
        Self {
            registry,
            type_name: type_name.into(),
        }
    }
}

impl MetadataPathResolver for NestedAggregateMetadataType<'_> {
    fn registry(&self) -> &MetadataTypeRegistry {
        self.registry
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn resolve_source_path(&self, full_name: &str, root_source_dir: &Path) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        // The global suffix, not the type's own file_suffix
        let file_name = format!(
            "{}{}",
            descriptor.file_name(full_name),
            self.registry.metadata_file_ext()
        );
        Ok(root_source_dir
            .join(&descriptor.default_directory)
            .join(full_name)
            .join(file_name))
    }

    fn resolve_source_metadata_path(
        &self,
        full_name: &str,
        root_source_dir: &Path,
    ) -> Result<PathBuf> {
        self.resolve_source_path(full_name, root_source_dir)
    }

    fn resolve_mdapi_path(&self, full_name: &str, mdapi_root_dir: &Path) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(mdapi_root_dir
            .join(&descriptor.default_directory)
            .join(full_name)
            .join(descriptor.file_name(full_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::descriptor::{MetadataTypeDescriptor, PathLayout};
    use crate::metadata::resolver::FileProperty;

    #[test]
    fn test_territory_model_paths() {
        let registry = MetadataTypeRegistry::with_builtin_types();
        let resolver = NestedAggregateMetadataType::new(&registry, "Territory2Model");

        assert_eq!(
            resolver
                .resolve_source_path("Global", Path::new("force-app/main/default"))
                .unwrap(),
            PathBuf::from(
                "force-app/main/default/territory2Models/Global/Global.territory2Model-meta.xml"
            )
        );
        assert_eq!(
            resolver
                .resolve_mdapi_path("Global", Path::new("mdapi"))
                .unwrap(),
            PathBuf::from("mdapi/territory2Models/Global/Global.territory2Model")
        );
    }

    #[test]
    fn test_uses_global_suffix_not_type_suffix() {
        let mut registry = MetadataTypeRegistry::new();
        registry
            .register(
                MetadataTypeDescriptor::new("Region", "region", "regions")
                    .with_layout(PathLayout::NestedAggregate)
                    .with_file_suffix(".xml"),
            )
            .unwrap();
        let resolver = NestedAggregateMetadataType::new(&registry, "Region");

        assert_eq!(
            resolver
                .resolve_source_path("North", Path::new("src"))
                .unwrap(),
            PathBuf::from("src/regions/North/North.region-meta.xml")
        );
    }

    #[test]
    fn test_extract_from_mdapi_file_name() {
        let registry = MetadataTypeRegistry::with_builtin_types();
        let resolver = NestedAggregateMetadataType::new(&registry, "Territory2Model");

        let name = resolver
            .extract_aggregate_name(
                &FileProperty::new("territory2Models/Global/Global.territory2Model"),
                Some("acme"),
            )
            .unwrap();
        assert_eq!(name, "Global");
    }
}
