/*!
 * Metadata types and their file-system layouts
 *
 * Every metadata type has a descriptor in the [`MetadataTypeRegistry`]. The
 * registry hands out a [`MetadataPathResolver`] per type, chosen by the
 * descriptor's [`PathLayout`]:
 *
 * - `Flat`: `classes/Foo.cls`
 * - `NestedAggregate`: `territory2Models/Foo/Foo.territory2Model`
 * - `Bundle`: `lwc/foo/` (directory per entity)
 */

pub mod bundle;
pub mod descriptor;
pub mod nested_aggregate;
pub mod registry;
pub mod resolver;

pub use bundle::BundleMetadataType;
pub use descriptor::{MetadataTypeDescriptor, PathLayout, METADATA_FILE_EXT};
pub use nested_aggregate::NestedAggregateMetadataType;
pub use registry::MetadataTypeRegistry;
pub use resolver::{DefaultMetadataType, FileProperty, MetadataPathResolver};
