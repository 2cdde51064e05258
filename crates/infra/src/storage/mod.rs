//! Credential storage backends
//!
//! Implementations of [`CredentialStorage`] selected by
//! [`StorageConfig::backend`].

pub mod file;
#[cfg(feature = "native-keychain")]
pub mod keychain;

use std::path::PathBuf;
use std::sync::Arc;

use pmdash_core::{CredentialStorage, MemoryCredentialStorage};
use pmdash_domain::{Result, StorageBackend, StorageConfig};
use tracing::info;

pub use file::FileCredentialStorage;
#[cfg(feature = "native-keychain")]
pub use keychain::KeychainCredentialStorage;

/// Build the configured storage backend
///
/// # Errors
/// Returns `PmDashError::Storage` if the file backend's directory cannot be
/// created, and `PmDashError::Config` for the keychain backend when the
/// crate was built without the `native-keychain` feature (keyring would
/// otherwise fall back to a mock store that forgets every write).
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn CredentialStorage>> {
    let storage: Arc<dyn CredentialStorage> = match config.backend {
        StorageBackend::File => {
            let directory = config.directory.clone().unwrap_or_else(default_directory);
            Arc::new(FileCredentialStorage::new(directory)?)
        }
        #[cfg(feature = "native-keychain")]
        StorageBackend::Keychain => {
            Arc::new(KeychainCredentialStorage::new(config.keychain_service.clone()))
        }
        #[cfg(not(feature = "native-keychain"))]
        StorageBackend::Keychain => {
            return Err(pmdash_domain::PmDashError::Config(
                "keychain storage requires building with the `native-keychain` feature".into(),
            ));
        }
        StorageBackend::Memory => Arc::new(MemoryCredentialStorage::new()),
    };

    info!(backend = %config.backend, "Credential storage ready");
    Ok(storage)
}

/// Platform data directory for the file backend, falling back to the
/// temporary directory on platforms without one.
pub fn default_directory() -> PathBuf {
    dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("pmdash")
}

#[cfg(test)]
mod tests {
    use pmdash_domain::{CredentialPair, PmDashError};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn memory_backend_is_ephemeral() {
        let config = StorageConfig { backend: StorageBackend::Memory, ..Default::default() };

        let first = open_storage(&config).unwrap();
        first.write("tokens", "{}").unwrap();

        let second = open_storage(&config).unwrap();
        assert!(second.read("tokens").unwrap().is_none());
    }

    #[test]
    fn file_backend_uses_configured_directory() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            directory: Some(dir.path().join("nested")),
            ..Default::default()
        };

        let storage = open_storage(&config).unwrap();
        let record = serde_json::to_string(&CredentialPair::new("A1", "R1")).unwrap();
        storage.write(&config.key, &record).unwrap();

        assert!(dir.path().join("nested").join("tokens.json").exists());
    }

    #[cfg(not(feature = "native-keychain"))]
    #[test]
    fn keychain_backend_is_rejected_without_platform_store() {
        let config = StorageConfig { backend: StorageBackend::Keychain, ..Default::default() };

        match open_storage(&config) {
            Err(PmDashError::Config(msg)) => assert!(msg.contains("native-keychain")),
            Err(other) => panic!("expected config error, got {other:?}"),
            Ok(_) => panic!("keychain backend must not open without a platform store"),
        }
    }

    #[test]
    fn default_directory_ends_with_app_name() {
        assert!(default_directory().ends_with("pmdash"));
    }
}
