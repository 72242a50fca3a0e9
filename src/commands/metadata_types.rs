//! `metadata types`: list the registry

use std::sync::Arc;

use async_trait::async_trait;
use comfy_table::Cell;

use super::Command;
use crate::cli_style::record_table;
use crate::error::Result;
use crate::metadata::{MetadataTypeDescriptor, MetadataTypeRegistry, PathLayout};

pub struct MetadataTypesCommand {
    registry: Arc<MetadataTypeRegistry>,
}

impl MetadataTypesCommand {
    pub fn new(registry: Arc<MetadataTypeRegistry>) -> Self {
        Self { registry }
    }
}

fn layout_label(layout: PathLayout) -> &'static str {
    match layout {
        PathLayout::Flat => "flat",
        PathLayout::NestedAggregate => "nested-aggregate",
        PathLayout::Bundle => "bundle",
    }
}

#[async_trait]
impl Command for MetadataTypesCommand {
    type Flags = ();
    type Context = ();
    type Output = Vec<MetadataTypeDescriptor>;

    fn validate(&self, _flags: ()) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, _context: ()) -> Result<Vec<MetadataTypeDescriptor>> {
        Ok(self.registry.descriptors().cloned().collect())
    }

    fn human_success_message(&self, descriptors: &Vec<MetadataTypeDescriptor>) -> String {
        let mut table = record_table(&["Name", "Extension", "Directory", "Layout", "Folder"]);
        for descriptor in descriptors {
            table.add_row(vec![
                Cell::new(&descriptor.name),
                Cell::new(&descriptor.extension),
                Cell::new(&descriptor.default_directory),
                Cell::new(layout_label(descriptor.layout)),
                Cell::new(if descriptor.is_folder_type { "yes" } else { "" }),
            ]);
        }
        table.to_string()
    }
}
