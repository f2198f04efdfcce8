//! Common test utilities

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use catalog_plugins::config::{MockDefaults, PluginSettings};
use catalog_plugins::mock::MockPlugin;
use tempfile::TempDir;

/// Test environment with isolated settings and download directories
pub struct TestEnvironment {
    pub config_dir: TempDir,
    pub settings_path: PathBuf,
    pub tmp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp dir");
        let settings_path = config_dir.path().join("settings.toml");
        let tmp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            config_dir,
            settings_path,
            tmp_dir,
        }
    }

    /// Settings written to this environment with no simulated latency
    pub fn fast_settings(&self) -> PluginSettings {
        let settings = PluginSettings {
            mock: MockDefaults { latency_ms: 0 },
            ..Default::default()
        };
        settings
            .save_to(&self.settings_path)
            .expect("Failed to write settings");
        settings
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

pub fn fast_mock() -> MockPlugin {
    MockPlugin::with_latency(Duration::ZERO)
}
