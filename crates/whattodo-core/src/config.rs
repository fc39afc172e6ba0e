//! Client configuration.
//!
//! `ClientConfig` is the value handed to [`ApiClient::new`](crate::ApiClient::new):
//! the backend base URL and the request timeout. There is no implicit global
//! URL; whoever builds the client says where it points.
//!
//! `Config` is the small persisted piece front-ends keep between runs (base
//! URL override and the last username typed into the login form), stored at
//! `~/.config/whattodo/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "whattodo";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend URL used when nothing else is configured (the development server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout in seconds; applies to every request the client sends
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable that overrides the backend base URL
const BASE_URL_ENV: &str = "WHATTODO_API_URL";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Base URL from `WHATTODO_API_URL`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Client configuration honoring the saved base URL override.
    pub fn client_config(&self) -> ClientConfig {
        match &self.base_url {
            Some(url) => ClientConfig::new(url.clone()),
            None => ClientConfig::default(),
        }
    }
}
