//! Application configuration

use ipfs_rpc::ClientOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// API address of a default local daemon install.
pub const DEFAULT_API_MULTIADDR: &str = "/ip4/127.0.0.1/tcp/5001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Control API address, as resolved by daemon discovery.
    pub api_multiaddr: String,
    /// Connect and read-inactivity timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
    /// Cap on concurrent `object/stat` calls while building the storage list.
    pub max_concurrent_stats: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_multiaddr: DEFAULT_API_MULTIADDR.to_string(),
            request_timeout_secs: None,
            max_concurrent_stats: None,
        }
    }
}

impl AppConfig {
    /// Load a JSON config file; missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            idle_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}
