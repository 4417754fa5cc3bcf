//! Application configuration management
//!
//! Handles loading and saving application settings including:
//! - Portal API address and request timeout
//! - OS color scheme polling period

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PortalError, Result};

/// Default portal API address
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base address of the portal REST API
    #[serde(default = "default_api_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How often the OS dark-mode setting is sampled, in seconds
    #[serde(default = "default_color_scheme_poll")]
    pub color_scheme_poll_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_color_scheme_poll() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            color_scheme_poll_secs: default_color_scheme_poll(),
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &PathBuf) -> Result<Self> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory (holds the preference store)
    pub fn data_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Set the API base address, validating it first
    pub fn set_api_base_url(&mut self, value: &str) -> Result<()> {
        let parsed = Url::parse(value).map_err(|_| PortalError::InvalidUrl(value.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(PortalError::InvalidUrl(value.to_string()));
        }
        self.api_base_url = value.trim_end_matches('/').to_string();
        Ok(())
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// OS color scheme sampling period
    pub fn color_scheme_poll(&self) -> Duration {
        Duration::from_secs(self.color_scheme_poll_secs.max(1))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "eduportal", "eduportal")
        .ok_or_else(|| PortalError::Config("Could not determine config directory".into()))
}
