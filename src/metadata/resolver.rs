//! Metadata path resolution
//!
//! [`MetadataPathResolver`] maps `(type, full name)` to paths in the source
//! tree and the mdapi tree, and maps remote file records back to full names.
//! The provided method bodies implement the flat layout; other layouts
//! override only what differs.
//!
//! All operations are pure: no filesystem access. Whether a resolved path
//! exists is the caller's business.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::descriptor::MetadataTypeDescriptor;
use super::registry::MetadataTypeRegistry;
use crate::error::Result;

/// File record reported by the remote platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperty {
    /// Reported file name, relative to the package root (`classes/Foo.cls`)
    pub file_name: String,

    /// Namespace qualifier of the owning package, if any
    #[serde(default)]
    pub namespace_prefix: Option<String>,
}

impl FileProperty {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            namespace_prefix: None,
        }
    }
}

pub trait MetadataPathResolver {
    /// Registry descriptors are read from
    fn registry(&self) -> &MetadataTypeRegistry;

    /// Metadata type this resolver serves
    fn type_name(&self) -> &str;

    /// Current descriptor for [`MetadataPathResolver::type_name`]
    fn descriptor(&self) -> Result<&MetadataTypeDescriptor> {
        self.registry().get(self.type_name())
    }

    /// Path of the entity's file in the source tree
    fn resolve_source_path(&self, full_name: &str, root_source_dir: &Path) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(root_source_dir
            .join(&descriptor.default_directory)
            .join(descriptor.file_name(full_name)))
    }

    /// Path of the entity's companion metadata file in the source tree
    fn resolve_source_metadata_path(
        &self,
        full_name: &str,
        root_source_dir: &Path,
    ) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(root_source_dir
            .join(&descriptor.default_directory)
            .join(descriptor.metadata_file_name(full_name)))
    }

    /// Path of the entity in the mdapi tree
    fn resolve_mdapi_path(&self, full_name: &str, mdapi_root_dir: &Path) -> Result<PathBuf> {
        let descriptor = self.descriptor()?;
        Ok(mdapi_root_dir
            .join(&descriptor.default_directory)
            .join(descriptor.file_name(full_name)))
    }

    /// Full name of the entity a remote file record belongs to
    ///
    /// `namespace` is accepted so every layout shares one signature.
    fn extract_aggregate_name(
        &self,
        file_property: &FileProperty,
        _namespace: Option<&str>,
    ) -> Result<String> {
        let descriptor = self.descriptor()?;
        let components = path_components(&file_property.file_name);

        if descriptor.is_folder_type {
            let rest = after_type_directory(&components, &descriptor.default_directory);
            if let Some((last, folders)) = rest.split_last() {
                let mut parts: Vec<&str> = folders.to_vec();
                parts.push(strip_type_extension(*last, descriptor, self.registry()));
                return Ok(parts.join("/"));
            }
        }

        let base = components.last().copied().unwrap_or_default();
        Ok(strip_type_extension(base, descriptor, self.registry()).to_string())
    }
}

/// Resolver for the flat layout
#[derive(Debug, Clone)]
pub struct DefaultMetadataType<'r> {
    registry: &'r MetadataTypeRegistry,
    type_name: String,
}

impl<'r> DefaultMetadataType<'r> {
    pub fn new(registry: &'r MetadataTypeRegistry, type_name: impl Into<String>) -> Self {
        Self {
            registry,
            type_name: type_name.into(),
        }
    }
}

impl MetadataPathResolver for DefaultMetadataType<'_> {
    fn registry(&self) -> &MetadataTypeRegistry {
        self.registry
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Split a reported file name on either separator, dropping empty segments
pub(crate) fn path_components(file_name: &str) -> Vec<&str> {
    file_name
        .split(&['/', '\\'][..])
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

/// Components following the type's directory, or all components when it is absent
///
/// The innermost occurrence wins, so ancestors of the package root that share
/// the directory's name are skipped. The file name itself is never taken as
/// the directory.
pub(crate) fn after_type_directory<'a>(
    components: &[&'a str],
    default_directory: &str,
) -> Vec<&'a str> {
    let parents = &components[..components.len().saturating_sub(1)];
    match parents.iter().rposition(|c| *c == default_directory) {
        Some(index) => components[index + 1..].to_vec(),
        None => components.to_vec(),
    }
}

/// Remove a trailing `.<ext>`, `.<ext><file_suffix>` or `.<ext>-meta.xml` from a base name
///
/// Only a trailing match is removed; the extension appearing earlier in the
/// name is left alone.
pub(crate) fn strip_type_extension<'a>(
    base: &'a str,
    descriptor: &MetadataTypeDescriptor,
    registry: &MetadataTypeRegistry,
) -> &'a str {
    let dotted = descriptor.dotted_extension();
    let candidates = [
        format!("{}{}", dotted, descriptor.file_suffix),
        format!("{}{}", dotted, registry.metadata_file_ext()),
        dotted,
    ];

    candidates
        .iter()
        .filter(|suffix| suffix.len() < base.len())
        .find_map(|suffix| base.strip_suffix(suffix.as_str()))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdpackError;

    fn registry() -> MetadataTypeRegistry {
        MetadataTypeRegistry::with_builtin_types()
    }

    #[test]
    fn test_default_source_and_mdapi_paths() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "ApexClass");

        assert_eq!(
            resolver
                .resolve_source_path("AccountService", Path::new("force-app/main/default"))
                .unwrap(),
            PathBuf::from("force-app/main/default/classes/AccountService.cls")
        );
        assert_eq!(
            resolver
                .resolve_mdapi_path("AccountService", Path::new("mdapi"))
                .unwrap(),
            PathBuf::from("mdapi/classes/AccountService.cls")
        );
        assert_eq!(
            resolver
                .resolve_source_metadata_path("AccountService", Path::new("src"))
                .unwrap(),
            PathBuf::from("src/classes/AccountService.cls-meta.xml")
        );
    }

    #[test]
    fn test_extract_strips_only_trailing_extension() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "ApexClass");

        let name = resolver
            .extract_aggregate_name(&FileProperty::new("classes/cls.Helper.cls"), None)
            .unwrap();
        assert_eq!(name, "cls.Helper");

        let name = resolver
            .extract_aggregate_name(&FileProperty::new("classes/Backup.cls.old"), None)
            .unwrap();
        assert_eq!(name, "Backup.cls.old");
    }

    #[test]
    fn test_extract_handles_metadata_file() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "ApexClass");

        let name = resolver
            .extract_aggregate_name(&FileProperty::new("classes/Foo.cls-meta.xml"), None)
            .unwrap();
        assert_eq!(name, "Foo");
    }

    #[test]
    fn test_extract_keeps_folder_for_folder_types() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "EmailTemplate");

        let name = resolver
            .extract_aggregate_name(
                &FileProperty::new("unpackaged/email/Marketing/Welcome.email"),
                None,
            )
            .unwrap();
        assert_eq!(name, "Marketing/Welcome");
    }

    #[test]
    fn test_extract_skips_ancestors_named_like_type_directory() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "EmailTemplate");

        let name = resolver
            .extract_aggregate_name(
                &FileProperty::new("/home/x/email/proj/force-app/main/default/email/Marketing/Welcome.email"),
                None,
            )
            .unwrap();
        assert_eq!(name, "Marketing/Welcome");
    }

    #[test]
    fn test_after_type_directory_ignores_file_name() {
        assert_eq!(
            after_type_directory(&["classes", "proj", "classes", "Foo.cls"], "classes"),
            vec!["Foo.cls"]
        );
        assert_eq!(after_type_directory(&["email"], "email"), vec!["email"]);
        assert!(after_type_directory(&[], "email").is_empty());
    }

    #[test]
    fn test_extract_accepts_backslashes() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "ApexTrigger");

        let name = resolver
            .extract_aggregate_name(&FileProperty::new("triggers\\OnAccount.trigger"), Some("ns"))
            .unwrap();
        assert_eq!(name, "OnAccount");
    }

    #[test]
    fn test_bare_extension_is_not_stripped_to_empty() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "ApexClass");

        let name = resolver
            .extract_aggregate_name(&FileProperty::new("classes/.cls"), None)
            .unwrap();
        assert_eq!(name, ".cls");
    }

    #[test]
    fn test_unknown_type_fails_every_operation() {
        let registry = registry();
        let resolver = DefaultMetadataType::new(&registry, "Widget");
        let root = Path::new("src");

        assert!(matches!(
            resolver.resolve_source_path("x", root),
            Err(MdpackError::UnknownMetadataType(_))
        ));
        assert!(matches!(
            resolver.resolve_mdapi_path("x", root),
            Err(MdpackError::UnknownMetadataType(_))
        ));
        assert!(matches!(
            resolver.extract_aggregate_name(&FileProperty::new("x"), None),
            Err(MdpackError::UnknownMetadataType(_))
        ));
    }

    #[test]
    fn test_file_property_deserializes_remote_shape() {
        let fp: FileProperty = serde_json::from_str(
            r#"{"fileName":"classes/Foo.cls","namespacePrefix":"acme","fullName":"Foo"}"#,
        )
        .unwrap();
        assert_eq!(fp.file_name, "classes/Foo.cls");
        assert_eq!(fp.namespace_prefix.as_deref(), Some("acme"));
    }
}
