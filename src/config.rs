// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration for k8s-tables
//!
//! Stores connection settings in a config file.
//! All k8s-tables data is stored under ~/.k8s-tables/:
//! - ~/.k8s-tables/config.json - user configuration
//! - ~/.k8s-tables/log/ - log files
//!
//! The cluster itself is reached through the user's kubeconfig
//! (~/.kube/config unless overridden).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the base k8s-tables directory (~/.k8s-tables/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".k8s-tables"))
        .context("Could not determine home directory")
}

/// Get the user's default kubeconfig path (~/.kube/config)
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".kube").join("config"))
        .context("Could not determine home directory")
}

/// k8s-tables configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Kubeconfig file to read instead of ~/.kube/config
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of its current-context
    pub context: Option<String>,
    /// Timeout for connecting to the K8s API
    pub connect_timeout_secs: u64,
    /// Timeout for reading K8s API responses
    pub read_timeout_secs: u64,
    /// Page size for paginated list requests
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            page_size: 500,
        }
    }
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from a specific file, or return default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the config file path (~/.k8s-tables/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Apply command-line overrides on top of the loaded file
    pub fn with_overrides(mut self, kubeconfig: Option<PathBuf>, context: Option<String>) -> Self {
        if kubeconfig.is_some() {
            self.kubeconfig = kubeconfig;
        }
        if context.is_some() {
            self.context = context;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.kubeconfig.is_none());
        assert!(config.context.is_none());
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.read_timeout(), Duration::from_secs(30));
        assert_eq!(config.page_size, 500);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let json = r#"{"context": "prod", "page_size": 100}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.context.as_deref(), Some("prod"));
        assert_eq!(config.page_size, 100);
        // Unspecified fields keep their defaults
        assert_eq!(config.read_timeout_secs, 30);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"kubeconfig": "/tmp/kc", "connect_timeout_secs": 3}"#,
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.kubeconfig, Some(PathBuf::from("/tmp/kc")));
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "not json").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides() {
        let config = Config {
            context: Some("staging".to_string()),
            ..Default::default()
        }
        .with_overrides(Some(PathBuf::from("/etc/kc")), None);

        assert_eq!(config.kubeconfig, Some(PathBuf::from("/etc/kc")));
        // Missing override keeps the file value
        assert_eq!(config.context.as_deref(), Some("staging"));
    }
}
