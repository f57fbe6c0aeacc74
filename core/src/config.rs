//! Configuration for the registry and its callers.
//!
//! Stored in JSON format at `~/.portsniper/config.json`. A missing file
//! means defaults; unknown or missing fields fall back to defaults as well.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::UNKNOWN_PROCESS;
use crate::error::{Error, Result};

/// Timing of the termination verification poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerminationConfig {
    /// How many times to check whether a killed process is gone.
    pub verify_attempts: u32,

    /// First pause between checks; doubles after every check.
    pub verify_initial_backoff_ms: u64,

    /// Upper bound on the total time spent waiting for the process to exit.
    pub verify_max_wait_ms: u64,

    /// Grace period between SIGTERM and SIGKILL in graceful mode.
    pub graceful_timeout_ms: u64,
}

impl TerminationConfig {
    pub fn verify_initial_backoff(&self) -> Duration {
        Duration::from_millis(self.verify_initial_backoff_ms)
    }

    pub fn verify_max_wait(&self) -> Duration {
        Duration::from_millis(self.verify_max_wait_ms)
    }

    pub fn graceful_timeout(&self) -> Duration {
        Duration::from_millis(self.graceful_timeout_ms)
    }
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            verify_attempts: 6,
            verify_initial_backoff_ms: 10,
            verify_max_wait_ms: 400,
            graceful_timeout_ms: 500,
        }
    }
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// Suggested port snapshot cadence for callers, in seconds.
    pub port_refresh_interval_secs: u64,

    /// Suggested telemetry cadence for callers, in seconds.
    pub telemetry_refresh_interval_secs: u64,

    /// Name given to sockets whose owning process is unknown.
    pub unknown_process_label: String,

    pub termination: TerminationConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            port_refresh_interval_secs: 3,
            telemetry_refresh_interval_secs: 2,
            unknown_process_label: UNKNOWN_PROCESS.to_string(),
            termination: TerminationConfig::default(),
        }
    }
}

/// Configuration store.
///
/// Handles reading and writing configuration to `~/.portsniper/config.json`.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.portsniper/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_path = home.join(".portsniper").join("config.json");
        Ok(Self { config_path })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<RegistryConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            return Ok(RegistryConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &RegistryConfig) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            fs::create_dir_all(config_dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        Ok(())
    }
}
