//! # Configuration
//!
//! Server configuration loaded from an optional TOML file. Every field has a
//! default, so an empty file (or no file at all) yields a working setup that
//! listens on `0.0.0.0:8000`, writes to `data.csv` and serves the current
//! directory.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ServerConfig = load_config("config/form-server.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening socket
    pub server: ListenConfig,
    /// Record store location and write policy
    pub storage: StorageConfig,
    /// Static asset directory
    pub assets: AssetsConfig,
}

/// Where the HTTP listener binds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Interface to bind (e.g., "0.0.0.0" for all interfaces)
    pub bind: String,
    /// TCP port
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the CSV file holding all submissions
    pub data_file: PathBuf,
    /// Flush every appended row to disk before answering the client
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.csv"),
            sync_writes: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub static_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Load server configuration from a TOML file.
    ///
    /// # Example
    /// ```ignore
    /// let config = ServerConfig::from_file("config/form-server.toml")?;
    /// ```
    pub fn from_file(path: &str) -> Result<Self> {
        load_config(path)
    }

    /// Socket address string the listener binds to (e.g., "0.0.0.0:8000").
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
