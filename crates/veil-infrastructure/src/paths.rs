//! Path management for veil configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/veil/              # Config directory ($VEIL_HOME overrides)
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Persisted session token (mode 600)
//! └── logs/                    # Application logs
//!     └── veil.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable that relocates the whole config directory.
pub const HOME_ENV: &str = "VEIL_HOME";

const APP_DIR: &str = "veil";

#[derive(Debug, Error)]
pub enum PathError {
    /// Neither `VEIL_HOME` nor a platform config directory is available.
    #[error("Cannot find config directory (set VEIL_HOME)")]
    ConfigDirNotFound,
}

/// Resolves every file veil reads or writes.
#[derive(Debug, Clone)]
pub struct VeilPaths {
    root: PathBuf,
}

impl VeilPaths {
    /// Uses an explicit root directory (tests, `--home`).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the root from `$VEIL_HOME`, falling back to the platform
    /// config directory (e.g. `~/.config/veil`).
    pub fn from_env() -> Result<Self, PathError> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(home));
        }
        let config_dir = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self::with_root(config_dir.join(APP_DIR)))
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to the session token file.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token; it is written with 600 permissions on Unix.
    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
