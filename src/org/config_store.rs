//! Local storage of authorized org configurations
//!
//! Each org is one JSON file named after its username. Files are written by
//! whatever performed the login; this crate only reads and removes them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MdpackError, Result};

/// Stored connection details for one org
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgConfig {
    pub org_id: String,
    pub username: String,
    pub instance_url: String,
    pub access_token: String,
    #[serde(default)]
    pub dev_hub_username: Option<String>,
    #[serde(default)]
    pub is_dev_hub: bool,
}

/// Read and remove stored org configurations
pub trait OrgConfigStore: Send + Sync {
    /// Load the config for a username
    fn load(&self, username: &str) -> Result<OrgConfig>;

    /// Remove the config for a username; removing a missing config is not an error
    fn remove(&self, username: &str) -> Result<()>;
}

/// `<orgs_dir>/<username>.json`
#[derive(Debug, Clone)]
pub struct FileOrgConfigStore {
    orgs_dir: PathBuf,
}

impl FileOrgConfigStore {
    pub fn new(orgs_dir: impl Into<PathBuf>) -> Self {
        Self {
            orgs_dir: orgs_dir.into(),
        }
    }

    pub fn orgs_dir(&self) -> &Path {
        &self.orgs_dir
    }

    /// File holding the config of `username`
    pub fn path_for(&self, username: &str) -> PathBuf {
        self.orgs_dir.join(format!("{}.json", username))
    }

    /// Write a config (used by tests and by tooling that seeds the store)
    pub fn save(&self, config: &OrgConfig) -> Result<()> {
        fs::create_dir_all(&self.orgs_dir)?;
        let contents = serde_json::to_string_pretty(config)?;
        fs::write(self.path_for(&config.username), contents)?;
        Ok(())
    }
}

impl OrgConfigStore for FileOrgConfigStore {
    fn load(&self, username: &str) -> Result<OrgConfig> {
        let path = self.path_for(username);
        let contents = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                MdpackError::OrgConfig(format!("No authorization found for {}", username))
            }
            _ => MdpackError::OrgConfig(format!("Failed to read {}: {}", path.display(), e)),
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| MdpackError::OrgConfig(format!("Corrupt org file {}: {}", path.display(), e)))
    }

    fn remove(&self, username: &str) -> Result<()> {
        let path = self.path_for(username);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Removed org config");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
