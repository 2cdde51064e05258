//! Platform keychain credential storage

use keyring::Entry;
use pmdash_core::CredentialStorage;
use pmdash_domain::{PmDashError, Result};
use tracing::debug;

use crate::errors::InfraError;

/// [`CredentialStorage`] backed by the OS keychain / credential manager.
///
/// The storage key is used as the keychain account under a fixed service
/// name. Only compiled with the `native-keychain` feature, which enables
/// keyring's platform stores.
#[derive(Debug, Clone)]
pub struct KeychainCredentialStorage {
    service: String,
}

impl KeychainCredentialStorage {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).map_err(|e| PmDashError::from(InfraError::from(e)))
    }
}

impl CredentialStorage for KeychainCredentialStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value).map_err(|e| PmDashError::from(InfraError::from(e)))?;
        debug!(service = %self.service, key = %key, "Credential record stored in keychain");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, key = %key, "Credential record removed from keychain");
                Ok(())
            }
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pmdash_core::CredentialStore;
    use pmdash_domain::CredentialPair;

    use super::*;

    #[test]
    fn keeps_service_name() {
        let storage = KeychainCredentialStorage::new("pmdash-test");
        assert_eq!(storage.service(), "pmdash-test");
    }

    #[test]
    #[ignore = "needs an unlocked platform credential store"]
    fn pair_survives_reopening_the_store() {
        let storage = Arc::new(KeychainCredentialStorage::new("pmdash-roundtrip-test"));
        let pair = CredentialPair::new("A1", "R1");

        let store = CredentialStore::open(storage.clone(), "tokens");
        store.set_credentials(Some(pair.clone())).unwrap();

        let reopened = CredentialStore::open(storage.clone(), "tokens");
        assert_eq!(reopened.current(), Some(pair));

        reopened.set_credentials(None).unwrap();
        assert!(CredentialStore::open(storage, "tokens").load_credentials().is_none());
    }
}
