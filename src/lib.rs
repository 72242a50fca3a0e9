/*!
 * mdpack - metadata layout and packaging request tooling
 *
 * A command layer over a remote platform's metadata and packaging APIs:
 * - Path resolution for metadata entities in source and mdapi layouts
 * - Long-running request tracking (version create, uninstall) with a
 *   bounded poller and error-detail aggregation
 * - Scratch org deletion through the owning dev hub
 */

pub mod cli_style;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod metadata;
pub mod org;
pub mod output;
pub mod package;

// Re-export commonly used types
pub use config::{CliConfig, LogLevel, PollSettings};
pub use error::{MdpackError, Result};
pub use gateway::{QueryApi, QueryGateway, QueryResult};
pub use metadata::{MetadataPathResolver, MetadataTypeDescriptor, MetadataTypeRegistry, PathLayout};
pub use package::{RequestStatus, StatusRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
