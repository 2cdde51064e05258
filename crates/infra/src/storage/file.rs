//! JSON file credential storage
//!
//! Each key is a `<key>.json` file inside one directory. Writes go to a temp
//! file in the same directory which is then renamed over the target, so a
//! reader never observes a half-written record.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use pmdash_core::CredentialStorage;
use pmdash_domain::{PmDashError, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::InfraError;

/// File-backed [`CredentialStorage`]
#[derive(Debug, Clone)]
pub struct FileCredentialStorage {
    directory: PathBuf,
}

impl FileCredentialStorage {
    /// Use `directory`, creating it if needed
    ///
    /// # Errors
    /// Returns `PmDashError::Storage` if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| PmDashError::from(InfraError::from(e)))?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl CredentialStorage for FileCredentialStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);

        // NamedTempFile is created owner-readable only.
        let mut temp = NamedTempFile::new_in(&self.directory)
            .map_err(|e| PmDashError::from(InfraError::from(e)))?;
        temp.write_all(value.as_bytes()).map_err(|e| PmDashError::from(InfraError::from(e)))?;
        temp.as_file().sync_all().map_err(|e| PmDashError::from(InfraError::from(e)))?;
        temp.persist(&path).map_err(|e| PmDashError::from(InfraError::from(e.error)))?;

        debug!(path = %path.display(), "Credential record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileCredentialStorage::new(dir.path()).unwrap();

        assert!(storage.read("tokens").unwrap().is_none());
    }

    #[test]
    fn write_replaces_previous_record() {
        let dir = TempDir::new().unwrap();
        let storage = FileCredentialStorage::new(dir.path()).unwrap();

        storage.write("tokens", "first").unwrap();
        storage.write("tokens", "second").unwrap();

        assert_eq!(storage.read("tokens").unwrap().as_deref(), Some("second"));
        // Only the record itself remains; the temp file was renamed away.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileCredentialStorage::new(dir.path()).unwrap();
        storage.write("tokens", "{}").unwrap();

        storage.remove("tokens").unwrap();
        storage.remove("tokens").unwrap();

        assert!(storage.read("tokens").unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn record_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileCredentialStorage::new(dir.path()).unwrap();
        storage.write("tokens", "{}").unwrap();

        let mode = fs::metadata(dir.path().join("tokens.json")).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }
}
