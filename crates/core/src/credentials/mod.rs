//! Credential store
//!
//! Single source of truth for the current [`CredentialPair`], kept in sync
//! with a [`CredentialStorage`] backend. The store is an owned object; every
//! component that needs credentials receives the same `Arc<CredentialStore>`.

pub mod ports;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use pmdash_domain::{CredentialPair, PmDashError, Result};
use tracing::{debug, info, warn};

use self::ports::CredentialStorage;

/// In-memory credential state backed by durable storage
pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
    key: String,
    current: RwLock<Option<CredentialPair>>,
    // Serializes writers; storage I/O happens under this, never under `current`.
    writer: Mutex<()>,
}

impl CredentialStore {
    /// Open the store, initialising in-memory state from the persisted record
    pub fn open(storage: Arc<dyn CredentialStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = read_record(storage.as_ref(), &key);
        if current.is_some() {
            info!(key = %key, "Loaded persisted credentials");
        } else {
            debug!(key = %key, "No persisted credentials");
        }

        Self { storage, key, current: RwLock::new(current), writer: Mutex::new(()) }
    }

    /// Read the persisted record.
    ///
    /// Missing, unreadable or malformed records yield `None`; this never
    /// fails.
    pub fn load_credentials(&self) -> Option<CredentialPair> {
        read_record(self.storage.as_ref(), &self.key)
    }

    /// Replace (or clear, with `None`) both the in-memory and persisted pair.
    ///
    /// Writers are serialized, so storage and memory end up agreeing after
    /// every call. Storage I/O runs outside the state lock: readers keep
    /// seeing the previous pair until a new one is persisted, and a clear
    /// takes effect in memory before the record is removed. A failed write
    /// leaves the previous pair in place; a failed removal still clears the
    /// in-memory pair.
    ///
    /// # Errors
    /// Returns the storage error when the backend cannot be updated.
    pub fn set_credentials(&self, pair: Option<CredentialPair>) -> Result<()> {
        let _writer = self.writer.lock();

        match pair {
            Some(pair) => {
                let record = serde_json::to_string(&pair).map_err(|e| {
                    PmDashError::Serialization(format!("Failed to encode credentials: {e}"))
                })?;
                self.storage.write(&self.key, &record)?;
                *self.current.write() = Some(pair);
                debug!(key = %self.key, "Credentials stored");
            }
            None => {
                *self.current.write() = None;
                self.storage.remove(&self.key)?;
                debug!(key = %self.key, "Credentials cleared");
            }
        }

        Ok(())
    }

    /// Current credential pair, read at call time
    pub fn current(&self) -> Option<CredentialPair> {
        self.current.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current.read().as_ref().map(|pair| pair.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.current.read().as_ref().map(|pair| pair.refresh.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Key the record is persisted under
    pub fn key(&self) -> &str {
        &self.key
    }
}

fn read_record(storage: &dyn CredentialStorage, key: &str) -> Option<CredentialPair> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key = %key, error = %err, "Credential storage unreadable, treating as signed out");
            return None;
        }
    };

    match serde_json::from_str::<CredentialPair>(&raw) {
        Ok(pair) => Some(pair),
        Err(err) => {
            warn!(key = %key, error = %err, "Malformed credential record, treating as signed out");
            None
        }
    }
}

/// Process-local [`CredentialStorage`]; nothing survives a restart.
///
/// Also used as a stand-in for durable storage in tests: a second
/// [`CredentialStore`] opened over the same instance behaves like a fresh
/// process reading the same disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a raw record, e.g. a corrupted one
    pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.entries.lock().insert(key.into(), value.into());
        storage
    }
}

impl CredentialStorage for MemoryCredentialStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    /// Storage whose writes and removals always fail
    struct BrokenStorage {
        record: Option<String>,
    }

    impl CredentialStorage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(self.record.clone())
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(PmDashError::Storage("read-only volume".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(PmDashError::Storage("read-only volume".into()))
        }
    }

    /// Storage that cannot even be read
    struct UnreadableStorage;

    impl CredentialStorage for UnreadableStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(PmDashError::Storage("permission denied".into()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn pair() -> CredentialPair {
        CredentialPair::new("A1", "R1")
    }

    #[test]
    fn set_then_reload_in_fresh_store_round_trips() {
        let storage = Arc::new(MemoryCredentialStorage::new());
        let store = CredentialStore::open(storage.clone(), "tokens");

        store.set_credentials(Some(pair())).unwrap();

        let reopened = CredentialStore::open(storage, "tokens");
        assert_eq!(reopened.current(), Some(pair()));
        assert_eq!(reopened.load_credentials(), Some(pair()));
    }

    #[test]
    fn clearing_removes_persisted_record() {
        let storage = Arc::new(MemoryCredentialStorage::new());
        let store = CredentialStore::open(storage.clone(), "tokens");
        store.set_credentials(Some(pair())).unwrap();

        store.set_credentials(None).unwrap();

        assert!(store.current().is_none());
        assert!(store.load_credentials().is_none());
        assert!(storage.read("tokens").unwrap().is_none());
        assert!(CredentialStore::open(storage, "tokens").current().is_none());
    }

    #[test]
    fn persisted_record_uses_access_refresh_shape() {
        let storage = Arc::new(MemoryCredentialStorage::new());
        let store = CredentialStore::open(storage.clone(), "tokens");
        store.set_credentials(Some(pair())).unwrap();

        let raw = storage.read("tokens").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"access": "A1", "refresh": "R1"}));
    }

    #[test]
    fn malformed_record_loads_as_absent() {
        let storage = Arc::new(MemoryCredentialStorage::with_record("tokens", "{not json"));
        let store = CredentialStore::open(storage, "tokens");

        assert!(store.current().is_none());
        assert!(store.load_credentials().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn record_missing_refresh_half_loads_as_absent() {
        let storage =
            Arc::new(MemoryCredentialStorage::with_record("tokens", r#"{"access": "A1"}"#));
        let store = CredentialStore::open(storage, "tokens");

        assert!(store.current().is_none());
    }

    #[test]
    fn unreadable_storage_loads_as_absent() {
        let store = CredentialStore::open(Arc::new(UnreadableStorage), "tokens");
        assert!(store.load_credentials().is_none());
        assert!(store.access_token().is_none());
    }

    #[test]
    fn failed_write_keeps_previous_pair() {
        let record = serde_json::to_string(&pair()).unwrap();
        let store = CredentialStore::open(Arc::new(BrokenStorage { record: Some(record) }), "tokens");

        let err = store.set_credentials(Some(CredentialPair::new("A2", "R2"))).unwrap_err();

        assert!(matches!(err, PmDashError::Storage(_)));
        assert_eq!(store.current(), Some(pair()));
    }

    #[test]
    fn failed_removal_still_signs_out_in_memory() {
        let record = serde_json::to_string(&pair()).unwrap();
        let store = CredentialStore::open(Arc::new(BrokenStorage { record: Some(record) }), "tokens");

        assert!(store.set_credentials(None).is_err());
        assert!(store.current().is_none());
    }

    #[test]
    fn accessors_reflect_latest_pair() {
        let store = CredentialStore::open(Arc::new(MemoryCredentialStorage::new()), "tokens");
        assert!(store.refresh_token().is_none());

        store.set_credentials(Some(pair())).unwrap();
        store.set_credentials(Some(pair().with_access("A2"))).unwrap();

        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
        assert_eq!(store.key(), "tokens");
    }

    /// Storage whose writes park until the test releases them
    struct GatedStorage {
        inner: MemoryCredentialStorage,
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl CredentialStorage for GatedStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<()> {
            let _ = self.entered.lock().send(());
            let _ = self.release.lock().recv();
            self.inner.write(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn readers_are_not_blocked_by_slow_persistence() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let storage = Arc::new(GatedStorage {
            inner: MemoryCredentialStorage::with_record(
                "tokens",
                serde_json::to_string(&pair()).unwrap(),
            ),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let store = Arc::new(CredentialStore::open(storage, "tokens"));

        let writer = {
            let store = store.clone();
            thread::spawn(move || store.set_credentials(Some(pair().with_access("A2"))))
        };
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let (read_tx, read_rx) = mpsc::channel();
        {
            let store = store.clone();
            thread::spawn(move || {
                let _ = read_tx.send(store.access_token());
            });
        }
        let seen = read_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("reader blocked while the record was being persisted");
        assert_eq!(seen.as_deref(), Some("A1"));

        release_tx.send(()).unwrap();
        writer.join().unwrap().unwrap();
        assert_eq!(store.access_token().as_deref(), Some("A2"));
    }
}
