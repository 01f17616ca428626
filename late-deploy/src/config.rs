//! Configuration for the late deployment pass.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable read by [`LateDeployConfig::from_env`].
pub const SCAN_DIR_ENV: &str = "LATE_DEPLOY_SCAN_DIR";

/// Late deployment settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateDeployConfig {
    /// Directory scanned for deployable artifacts.
    #[serde(alias = "webapps_late_path")]
    pub scan_dir: PathBuf,
}

impl LateDeployConfig {
    /// Creates a configuration scanning `scan_dir`.
    #[must_use]
    pub fn new(scan_dir: impl Into<PathBuf>) -> Self {
        Self {
            scan_dir: scan_dir.into(),
        }
    }

    /// Creates a configuration from the string form of the scan directory.
    pub fn from_path_str(scan_dir: &str) -> Result<Self, ConfigError> {
        let config = Self::new(scan_dir.trim());
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the scan directory from `LATE_DEPLOY_SCAN_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = std::env::var(SCAN_DIR_ENV).map_err(|_| ConfigError::MissingScanDir)?;
        Self::from_path_str(&value)
    }

    /// Sets the scan directory.
    #[must_use]
    pub fn with_scan_dir(mut self, scan_dir: impl Into<PathBuf>) -> Self {
        self.scan_dir = scan_dir.into();
        self
    }

    /// The directory scanned for deployables.
    #[must_use]
    pub fn scan_dir(&self) -> &Path {
        &self.scan_dir
    }

    /// Checks that the scan directory is set.
    ///
    /// The directory itself is not inspected here; a missing directory is
    /// reported when the pass runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingScanDir);
        }
        Ok(())
    }
}
