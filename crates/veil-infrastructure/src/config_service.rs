//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `<config dir>/config.toml` and applies
//! environment overrides on top.

use veil_core::config::ClientConfig;
use veil_core::{Result, VeilError};

use crate::paths::VeilPaths;
use crate::storage::AtomicTomlFile;

pub const BASE_URL_ENV: &str = "VEIL_BASE_URL";
pub const LOG_LEVEL_ENV: &str = "VEIL_LOG_LEVEL";

/// Configuration service that reads config.toml and the environment.
///
/// Precedence, lowest to highest: built-in defaults, config file,
/// environment variables. Command-line flags are applied by the caller.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: VeilPaths,
}

impl ConfigService {
    pub fn new(paths: VeilPaths) -> Self {
        Self { paths }
    }

    /// Loads the configuration using the process environment.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the configuration with a custom environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = AtomicTomlFile::<ClientConfig>::new(self.paths.config_file());
        let mut config = file
            .load()
            .map_err(|e| {
                VeilError::config(format!(
                    "Failed to read {}: {}",
                    self.paths.config_file().display(),
                    e
                ))
            })?
            .unwrap_or_default();

        if let Some(base_url) = env(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(level) = env(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            config.log_level = level;
        }

        config.validate()
    }

    /// Writes the configuration file (used by `veil config init`).
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        AtomicTomlFile::new(self.paths.config_file()).save(config)?;
        Ok(())
    }
}
