//! Metadata type descriptors

use serde::{Deserialize, Serialize};

/// Suffix of the companion metadata file written next to source files
pub const METADATA_FILE_EXT: &str = "-meta.xml";

/// On-disk layout family of a metadata type; selects its path resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PathLayout {
    /// One file per entity directly under the type directory
    #[default]
    Flat,
    /// One directory per entity holding `<name>.<ext>` plus its metadata file
    NestedAggregate,
    /// One directory per entity holding several loosely named files
    Bundle,
}

/// Declarative definition of one metadata type
///
/// Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataTypeDescriptor {
    /// Type name, e.g. `ApexClass`
    pub name: String,

    /// File extension without the leading dot, e.g. `cls`
    pub extension: String,

    /// Directory under the package root, e.g. `classes`
    pub default_directory: String,

    /// Entities are directories of files rather than single files
    #[serde(default)]
    pub is_bundle: bool,

    /// Entity names carry a folder prefix (`Folder/Name`)
    #[serde(default)]
    pub is_folder_type: bool,

    /// Suffix appended after `.<extension>` for the serialized metadata file
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Resolver family
    #[serde(default)]
    pub layout: PathLayout,
}

fn default_file_suffix() -> String {
    METADATA_FILE_EXT.to_string()
}

impl MetadataTypeDescriptor {
    /// Flat type with the default metadata file suffix
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        default_directory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            default_directory: default_directory.into(),
            is_bundle: false,
            is_folder_type: false,
            file_suffix: default_file_suffix(),
            layout: PathLayout::Flat,
        }
    }

    /// Mark as a bundle type (implies the bundle layout)
    pub fn bundle(mut self) -> Self {
        self.is_bundle = true;
        self.layout = PathLayout::Bundle;
        self
    }

    /// Mark as a folder type
    pub fn folder_type(mut self) -> Self {
        self.is_folder_type = true;
        self
    }

    /// Override the layout family
    pub fn with_layout(mut self, layout: PathLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Override the metadata file suffix
    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// `.<extension>`
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.extension)
    }

    /// `<full_name>.<extension>`
    pub fn file_name(&self, full_name: &str) -> String {
        format!("{}.{}", full_name, self.extension)
    }

    /// `<full_name>.<extension><file_suffix>`
    pub fn metadata_file_name(&self, full_name: &str) -> String {
        format!("{}.{}{}", full_name, self.extension, self.file_suffix)
    }
}
