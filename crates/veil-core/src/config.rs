use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VeilError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Client configuration (`config.toml`).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the steganography service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Checks `base_url` is an absolute http(s) URL and trims any trailing
    /// slash so download paths can be appended verbatim.
    pub fn validate(mut self) -> Result<Self> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| VeilError::config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VeilError::config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
