//! Configuration structures
//!
//! Every field has a default so partial JSON/TOML files are accepted.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_CREDENTIALS_KEY,
    DEFAULT_KEYCHAIN_SERVICE, DEFAULT_TIMEOUT_SECS,
};
use crate::impl_domain_status_conversions;

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

/// Remote API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server root, e.g. `http://127.0.0.1:8000` (the `/api` prefix is added
    /// by the client)
    pub base_url: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: Option<String>,
    /// Explicit proxy URL for every request. When unset, the standard
    /// `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` environment is honored.
    pub proxy: Option<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: None,
            proxy: None,
        }
    }
}

/// Where the credential pair is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON file inside [`StorageConfig::directory`]
    #[default]
    File,
    /// Platform keychain / credential manager
    Keychain,
    /// Process memory only; nothing survives a restart
    Memory,
}

impl_domain_status_conversions!(StorageBackend {
    File => "file",
    Keychain => "keychain",
    Memory => "memory",
});

/// Credential persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend; defaults to the platform data dir
    pub directory: Option<PathBuf>,
    /// Fixed key the credential record is stored under
    pub key: String,
    /// Service name used by the keychain backend
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            directory: None,
            key: DEFAULT_CREDENTIALS_KEY.to_string(),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}
