//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the base URL is not set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PMDASH_API_BASE_URL`: Server root (required; `VITE_API_BASE_URL` is
//!   accepted as a fallback)
//! - `PMDASH_API_TIMEOUT`: Request timeout in seconds
//! - `PMDASH_API_CONNECT_TIMEOUT`: Connect timeout in seconds
//! - `PMDASH_API_USER_AGENT`: User-Agent header
//! - `PMDASH_API_PROXY`: Explicit proxy URL (otherwise `HTTP(S)_PROXY` apply)
//! - `PMDASH_STORAGE_BACKEND`: `file`, `keychain` or `memory`
//! - `PMDASH_STORAGE_DIR`: Directory for the file backend
//! - `PMDASH_STORAGE_KEY`: Key the credential record is stored under
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./pmdash.json` or `./pmdash.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pmdash_domain::{ApiConfig, Config, PmDashError, Result, StorageBackend, StorageConfig};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the base URL is
/// missing there, falls back to a config file.
///
/// # Errors
/// Returns `PmDashError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the base URL is required; everything else falls back to defaults.
///
/// # Errors
/// Returns `PmDashError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("PMDASH_API_BASE_URL").or_else(|_| env_var("VITE_API_BASE_URL"))?;

    let defaults = ApiConfig::default();
    let api = ApiConfig {
        base_url,
        timeout_seconds: env_parse("PMDASH_API_TIMEOUT")?.unwrap_or(defaults.timeout_seconds),
        connect_timeout_seconds: env_parse("PMDASH_API_CONNECT_TIMEOUT")?
            .unwrap_or(defaults.connect_timeout_seconds),
        user_agent: std::env::var("PMDASH_API_USER_AGENT").ok(),
        proxy: env_var("PMDASH_API_PROXY").ok(),
    };

    let defaults = StorageConfig::default();
    let storage = StorageConfig {
        backend: env_parse::<StorageBackend>("PMDASH_STORAGE_BACKEND")?
            .unwrap_or(defaults.backend),
        directory: std::env::var("PMDASH_STORAGE_DIR").ok().map(PathBuf::from),
        key: std::env::var("PMDASH_STORAGE_KEY").unwrap_or(defaults.key),
        keychain_service: defaults.keychain_service,
    };

    Ok(Config { api, storage })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PmDashError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PmDashError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PmDashError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PmDashError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, by file extension
///
/// # Errors
/// Returns `PmDashError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PmDashError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PmDashError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PmDashError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("pmdash.json"),
        dir.join("pmdash.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `PmDashError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PmDashError::Config(format!("Missing required environment variable: {}", key))),
    }
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `PmDashError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PmDashError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}
