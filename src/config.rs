//! Configuration for the board sync engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default sled path for fallback snapshots
pub fn default_cache_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("adboard")
        .join("fallback.sled")
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Base URL of the remote authority HTTP API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for remote calls in seconds; the sole trigger for the
    /// local-fallback branch is a failure at this boundary
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Path to the sled database holding fallback snapshots
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_path: default_cache_path(),
        }
    }
}
