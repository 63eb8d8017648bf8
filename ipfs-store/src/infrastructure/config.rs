//! Configuration management for storage backends

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StoreConfig {
    /// Which backend the DAO talks to
    #[serde(default)]
    pub backend: BackendKind,

    /// IPFS node configuration
    #[serde(default)]
    pub ipfs: IpfsConfig,
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ipfs.cid_version > 1 {
            return Err(ConfigError::Parse(format!(
                "ipfs.cid_version must be 0 or 1, got {}",
                self.ipfs.cid_version
            )));
        }
        if self.ipfs.api_url.trim().is_empty() {
            return Err(ConfigError::Parse("ipfs.api_url must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// IPFS node reached over its HTTP RPC API
    #[default]
    Ipfs,
    /// Process-local store, mainly for development
    Memory,
}

/// IPFS node configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IpfsConfig {
    /// Base URL of the node's RPC API (e.g., "http://127.0.0.1:5001")
    #[serde(default = "default_ipfs_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds (no timeout when absent)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Ask the node to pin content as part of `add`
    #[serde(default = "default_pin_on_add")]
    pub pin_on_add: bool,

    /// CID version of identifiers returned by `add` (0 => "Qm...")
    #[serde(default)]
    pub cid_version: u8,
}

impl IpfsConfig {
    /// Returns the request timeout as a `Duration`
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: default_ipfs_api_url(),
            timeout_secs: None,
            pin_on_add: default_pin_on_add(),
            cid_version: 0,
        }
    }
}

fn default_ipfs_api_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_pin_on_add() -> bool {
    true
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Unsupported configuration: {0}")]
    Unsupported(String),
}
