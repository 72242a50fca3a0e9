//! `source name`: the entity name a file belongs to

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::Command;
use crate::error::{MdpackError, Result};
use crate::metadata::{FileProperty, MetadataTypeRegistry};

#[derive(Debug, Clone, Default)]
pub struct SourceNameFlags {
    pub type_name: String,
    /// File path relative to the tree root
    pub file_name: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNameResult {
    pub type_name: String,
    pub file_name: String,
    pub full_name: String,
}

pub struct SourceNameCommand {
    registry: Arc<MetadataTypeRegistry>,
}

impl SourceNameCommand {
    pub fn new(registry: Arc<MetadataTypeRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Command for SourceNameCommand {
    type Flags = SourceNameFlags;
    type Context = SourceNameFlags;
    type Output = SourceNameResult;

    fn validate(&self, mut flags: SourceNameFlags) -> Result<SourceNameFlags> {
        if flags.file_name.trim().is_empty() {
            return Err(MdpackError::InvalidArgument(
                "A file name is required".to_string(),
            ));
        }
        flags.type_name = self.registry.get(&flags.type_name)?.name.clone();
        Ok(flags)
    }

    async fn execute(&self, flags: SourceNameFlags) -> Result<SourceNameResult> {
        let resolver = self.registry.resolver(&flags.type_name)?;
        let property = FileProperty {
            file_name: flags.file_name.clone(),
            namespace_prefix: flags.namespace.clone(),
        };
        let full_name = resolver.extract_aggregate_name(&property, flags.namespace.as_deref())?;

        Ok(SourceNameResult {
            type_name: flags.type_name,
            file_name: flags.file_name,
            full_name,
        })
    }

    fn human_success_message(&self, result: &SourceNameResult) -> String {
        result.full_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn name_of(type_name: &str, file_name: &str) -> Result<String> {
        let command = SourceNameCommand::new(Arc::new(MetadataTypeRegistry::with_builtin_types()));
        let context = command.validate(SourceNameFlags {
            type_name: type_name.to_string(),
            file_name: file_name.to_string(),
            namespace: None,
        })?;
        Ok(command.execute(context).await?.full_name)
    }

    #[tokio::test]
    async fn test_extracts_names_per_layout() {
        assert_eq!(name_of("ApexClass", "classes/Foo.cls").await.unwrap(), "Foo");
        assert_eq!(
            name_of("ApexClass", "classes/Foo.cls-meta.xml").await.unwrap(),
            "Foo"
        );
        assert_eq!(
            name_of("AuraDefinitionBundle", "aura/Widget/WidgetController.js")
                .await
                .unwrap(),
            "Widget"
        );
        assert_eq!(
            name_of("EmailTemplate", "email/Marketing/Welcome.email")
                .await
                .unwrap(),
            "Marketing/Welcome"
        );
    }

    #[tokio::test]
    async fn test_requires_file_name() {
        let err = name_of("ApexClass", "").await.unwrap_err();
        assert!(matches!(err, MdpackError::InvalidArgument(_)));
    }
}
