/*!
 * Configuration types for mdpack
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use mdpack_core_poll::PollPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{MdpackError, Result};
use crate::metadata::{MetadataTypeDescriptor, MetadataTypeRegistry};

/// Default platform API version
pub const DEFAULT_API_VERSION: &str = "45.0";

/// Main CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Platform API version used in REST paths
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Directory holding one JSON file per authorized org
    #[serde(default)]
    pub orgs_dir: Option<PathBuf>,

    /// Org used when no target username is given
    #[serde(default)]
    pub default_username: Option<String>,

    /// Dev hub used when no dev hub username is given
    #[serde(default)]
    pub default_devhub_username: Option<String>,

    /// Polling behaviour for `--wait`
    #[serde(default)]
    pub poll: PollSettings,

    /// Extra metadata types registered after the built-in ones
    #[serde(default)]
    pub metadata_types: Vec<MetadataTypeDescriptor>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            api_version: default_api_version(),
            orgs_dir: None,
            default_username: None,
            default_devhub_username: None,
            poll: PollSettings::default(),
            metadata_types: Vec::new(),
        }
    }
}

/// Poll interval and backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSettings {
    /// Seconds between status queries
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Multiplier applied to the interval after every query (1.0 = fixed)
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Ceiling for the backed-off interval, in seconds
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            backoff_factor: default_backoff_factor(),
            max_interval_secs: default_max_interval_secs(),
        }
    }
}

impl PollSettings {
    /// Policy for a single status query
    pub fn report_policy(&self) -> PollPolicy {
        PollPolicy::once()
    }

    /// Policy for waiting up to `wait_minutes` on a request
    ///
    /// The follow-up budget is sized so the waits between queries, backoff
    /// included, add up to no more than the wait window.
    pub fn wait_policy(&self, wait_minutes: u64) -> PollPolicy {
        let interval = Duration::from_secs(self.interval_secs.max(1));
        PollPolicy::fixed(0, interval)
            .with_backoff(
                self.backoff_factor,
                Duration::from_secs(self.max_interval_secs),
            )
            .fit_to_window(Duration::from_secs(wait_minutes.saturating_mul(60)))
    }
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_interval_secs() -> u64 {
    5
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_max_interval_secs() -> u64 {
    60
}

impl CliConfig {
    /// `<config_dir>/mdpack/config.toml`, when a config dir exists on this platform
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mdpack").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MdpackError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| MdpackError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| MdpackError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load the explicit file if given, else the default file if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Directory of stored org configurations
    pub fn orgs_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.orgs_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".mdpack").join("orgs"))
            .ok_or_else(|| {
                MdpackError::Config("Cannot determine home directory for org storage".to_string())
            })
    }

    /// Built-in metadata types plus the configured extras
    pub fn registry(&self) -> Result<MetadataTypeRegistry> {
        let mut registry = MetadataTypeRegistry::with_builtin_types();
        for descriptor in &self.metadata_types {
            registry.register(descriptor.clone())?;
        }
        Ok(registry)
    }
}
