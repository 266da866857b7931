//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::NexusConfig;
use crate::error::NexusError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from the standard sources plus an optional explicit file.
    pub fn load(config_file: Option<&Path>) -> Result<NexusConfig, NexusError> {
        let config = MergeService::load(config_file)?;
        config.validate().map_err(NexusError::Config)?;
        Ok(config)
    }

    /// Load configuration from a specific file and the environment only.
    pub fn load_from_file(path: &Path) -> Result<NexusConfig, NexusError> {
        let config = MergeService::load_from_file(path)?;
        config.validate().map_err(NexusError::Config)?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> NexusConfig {
        NexusConfig::default()
    }
}
