//! Persisted client configuration.
//!
//! Stored as `config.json`, versioned, with every field defaulted so partial
//! or missing files still load. The session itself takes plain values; this
//! module is only the durable source the launcher reads them from.

use crate::error::config::ConfigError;
use crate::transport::AuthLevel;
use crate::{CORE_ADDRESS, RETRY_POLL_INTERVAL};

use models::ErrorLocation;

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Authentication strength requested for every connection attempt.
    #[serde(default)]
    pub auth_level: AuthLevel,

    /// Fixed reconnect poll interval in milliseconds.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Daemon RPC endpoint handed to the transport layer.
    #[serde(default = "default_core_address")]
    pub core_address: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            auth_level: AuthLevel::default(),
            retry_interval_ms: default_retry_interval_ms(),
            core_address: default_core_address(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_retry_interval_ms() -> u64 {
    RETRY_POLL_INTERVAL.as_millis() as u64
}

fn default_core_address() -> String {
    String::from(CORE_ADDRESS)
}

impl ClientConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Load config from `{config_dir}/config.json`.
    ///
    /// Returns defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            })?;

        let config: ClientConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            })?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Load config, falling back to defaults on any error.
    pub fn load_or_default(config_dir: &Path) -> Self {
        match Self::load(config_dir) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save config to `{config_dir}/config.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if directory creation, serialization, or the
    /// write fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let contents =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
                location: ErrorLocation::from(Location::caller()),
                reason: e.to_string(),
            })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
