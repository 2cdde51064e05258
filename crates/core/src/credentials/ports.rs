//! Port interface for durable credential storage
//!
//! Implementations behave like a small key-value store (one record per key,
//! text values). Infrastructure provides file and keychain backends.

use pmdash_domain::Result;

/// Durable key-value storage for the serialized credential record
pub trait CredentialStorage: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}
