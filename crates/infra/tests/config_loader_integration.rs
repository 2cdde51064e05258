//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use pmdash_domain::StorageBackend;
use pmdash_infra::{config, ApiClientConfig};
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "api": {
            "base_url": "https://pm.example.com/",
            "timeout_seconds": 12,
            "connect_timeout_seconds": 4
        },
        "storage": {
            "backend": "keychain",
            "keychain_service": "pmdash-integration"
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.storage.backend, StorageBackend::Keychain);
    assert_eq!(config.storage.keychain_service, "pmdash-integration");
    assert_eq!(config.storage.key, "tokens");

    let client_config = ApiClientConfig::from(&config.api);
    assert_eq!(client_config.base_url, "https://pm.example.com/api");
    assert_eq!(client_config.timeout.as_secs(), 12);
    assert_eq!(client_config.connect_timeout.as_secs(), 4);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[api]
base_url = "http://127.0.0.1:8000"

[storage]
backend = "memory"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.storage.backend, StorageBackend::Memory);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(b"[api\nbase_url = ").expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(err.to_string().contains("Invalid TOML"));

    std::fs::remove_file(path).ok();
}
