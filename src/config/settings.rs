use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Plugin-wide settings stored in settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PluginSettings {
    #[serde(default)]
    pub sftp: SftpDefaults,
    #[serde(default)]
    pub mock: MockDefaults,
}

impl PluginSettings {
    /// Load from the default location, creating the file with defaults if it does not exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = super::paths::settings_file().ok_or_else(|| ConfigError::ReadFile {
            path: std::path::PathBuf::from("settings.toml"),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine settings file path",
            ),
        })?;

        if !path.exists() {
            let settings = Self::default();
            super::paths::ensure_config_dir().map_err(ConfigError::CreateDir)?;
            settings.save_to(&path)?;
            return Ok(settings);
        }

        Self::load_from(&path)
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_keepalive() -> u64 {
    60
}

fn default_latency() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SftpDefaults {
    #[serde(default = "default_timeout")]
    pub connection_timeout_secs: u64,
    /// 0 disables keepalive
    #[serde(default = "default_keepalive")]
    pub keepalive_interval_secs: u64,
}

impl Default for SftpDefaults {
    fn default() -> Self {
        Self {
            connection_timeout_secs: default_timeout(),
            keepalive_interval_secs: default_keepalive(),
        }
    }
}

impl SftpDefaults {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MockDefaults {
    /// Simulated network latency applied to every mock call
    #[serde(default = "default_latency")]
    pub latency_ms: u64,
}

impl Default for MockDefaults {
    fn default() -> Self {
        Self {
            latency_ms: default_latency(),
        }
    }
}

impl MockDefaults {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
