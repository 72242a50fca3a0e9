//! Metadata type registry
//!
//! Built once at startup, then shared read-only (`Arc<MetadataTypeRegistry>`)
//! with every resolver and command. Resolvers look their descriptor up here
//! on every call instead of keeping a copy.

use std::collections::BTreeMap;

use tracing::debug;

use super::bundle::BundleMetadataType;
use super::descriptor::{MetadataTypeDescriptor, PathLayout, METADATA_FILE_EXT};
use super::nested_aggregate::NestedAggregateMetadataType;
use super::resolver::{DefaultMetadataType, MetadataPathResolver};
use crate::error::{MdpackError, Result};

/// Registry of metadata type descriptors keyed by type name
#[derive(Debug, Clone, Default)]
pub struct MetadataTypeRegistry {
    types: BTreeMap<String, MetadataTypeDescriptor>,
}

impl MetadataTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in metadata types
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin_types() {
            // Built-in names are unique
            registry
                .types
                .insert(descriptor.name.clone(), descriptor);
        }
        registry
    }

    /// Register a descriptor; each type name can be registered once
    ///
    /// Names differing only in ASCII case count as the same type, matching
    /// how [`get`](Self::get) looks them up.
    pub fn register(&mut self, descriptor: MetadataTypeDescriptor) -> Result<()> {
        if self
            .types
            .keys()
            .any(|name| name.eq_ignore_ascii_case(&descriptor.name))
        {
            return Err(MdpackError::DuplicateMetadataType(descriptor.name));
        }
        debug!(
            type_name = %descriptor.name,
            layout = ?descriptor.layout,
            "Registered metadata type"
        );
        self.types.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by type name
    ///
    /// Exact matches win; otherwise the name is matched ignoring ASCII case.
    pub fn get(&self, type_name: &str) -> Result<&MetadataTypeDescriptor> {
        if let Some(descriptor) = self.types.get(type_name) {
            return Ok(descriptor);
        }
        self.types
            .values()
            .find(|d| d.name.eq_ignore_ascii_case(type_name))
            .ok_or_else(|| MdpackError::UnknownMetadataType(type_name.to_string()))
    }

    /// Whether a type name is registered
    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_ok()
    }

    /// Registered type names in sorted order
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Registered descriptors in type name order
    pub fn descriptors(&self) -> impl Iterator<Item = &MetadataTypeDescriptor> {
        self.types.values()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Global suffix of companion metadata files
    pub fn metadata_file_ext(&self) -> &'static str {
        METADATA_FILE_EXT
    }

    /// Path resolver for a type, chosen by the descriptor's layout
    pub fn resolver(&self, type_name: &str) -> Result<Box<dyn MetadataPathResolver + '_>> {
        let descriptor = self.get(type_name)?;
        let name = descriptor.name.clone();
        let resolver: Box<dyn MetadataPathResolver + '_> = match descriptor.layout {
            PathLayout::Flat => Box::new(DefaultMetadataType::new(self, name)),
            PathLayout::NestedAggregate => Box::new(NestedAggregateMetadataType::new(self, name)),
            PathLayout::Bundle => Box::new(BundleMetadataType::new(self, name)),
        };
        Ok(resolver)
    }
}

fn builtin_types() -> Vec<MetadataTypeDescriptor> {
    vec![
        MetadataTypeDescriptor::new("ApexClass", "cls", "classes"),
        MetadataTypeDescriptor::new("ApexComponent", "component", "components"),
        MetadataTypeDescriptor::new("ApexPage", "page", "pages"),
        MetadataTypeDescriptor::new("ApexTrigger", "trigger", "triggers"),
        MetadataTypeDescriptor::new("CustomObject", "object", "objects"),
        MetadataTypeDescriptor::new("Layout", "layout", "layouts"),
        MetadataTypeDescriptor::new("StaticResource", "resource", "staticresources"),
        MetadataTypeDescriptor::new("Territory2Model", "territory2Model", "territory2Models")
            .with_layout(PathLayout::NestedAggregate),
        MetadataTypeDescriptor::new("Territory2Type", "territory2Type", "territory2Types"),
        MetadataTypeDescriptor::new("AuraDefinitionBundle", "cmp", "aura").bundle(),
        MetadataTypeDescriptor::new("LightningComponentBundle", "js", "lwc").bundle(),
        MetadataTypeDescriptor::new("Document", "document", "documents").folder_type(),
        MetadataTypeDescriptor::new("EmailTemplate", "email", "email").folder_type(),
        MetadataTypeDescriptor::new("Report", "report", "reports").folder_type(),
        MetadataTypeDescriptor::new("Dashboard", "dashboard", "dashboards").folder_type(),
    ]
}
