//! Wallet persistence layer
//!
//! Provides save/load for the single wallet record. Writes go to a
//! temporary file that is renamed over the target, so a failed save
//! leaves any previous wallet file untouched.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Wallet file not found: {0}")]
    NotFound(PathBuf),
}

/// Persisted form of a key pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
}

/// File-backed store for one wallet record
#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    /// Create a store addressing `path`; nothing is touched on disk yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the wallet file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a saved wallet exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Save the record, creating missing parent directories
    pub fn save(&self, record: &WalletRecord) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // Uniquely named, created owner-only; removed on drop if not persisted
        let temp = NamedTempFile::new_in(parent)?;
        write_record(temp.as_file(), record)?;

        // Atomic rename
        temp.persist(&self.path).map_err(|e| e.error)?;

        log::debug!("Wallet saved to {}", self.path.display());
        Ok(())
    }

    /// Load the record from disk
    pub fn load(&self) -> Result<WalletRecord, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::NotFound(self.path.clone()));
        }

        let json = fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&json)?;
        Ok(record)
    }
}

/// Serialize the record into an already opened private file
fn write_record(file: &File, record: &WalletRecord) -> Result<(), StorageError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> WalletRecord {
        WalletRecord {
            private_key: "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .to_string(),
            public_key: "04".to_string() + &"ab".repeat(64),
            address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
        }
    }

    #[test]
    fn test_save_load_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path().join("wallet.json"));
        assert!(!store.exists());

        store.save(&sample_record()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), sample_record());
    }

    #[test]
    fn test_json_field_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path().join("wallet.json"));
        store.save(&sample_record()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(value.get("private_key").is_some());
        assert!(value.get("public_key").is_some());
        assert!(value.get("address").is_some());
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("wallet.json");
        let store = WalletStore::new(&path);

        store.save(&sample_record()).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path().join("wallet.json"));
        store.save(&sample_record()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("wallet.json");
        fs::write(&path, "{ not json").unwrap();

        let store = WalletStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(StorageError::SerializationError(_))
        ));
    }

    #[test]
    fn test_failed_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("wallet.json");

        // A non-empty directory cannot be replaced by the rename
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let store = WalletStore::new(&path);
        assert!(store.save(&sample_record()).is_err());

        assert!(path.join("keep.txt").exists());
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path().join("wallet.json"));
        store.save(&sample_record()).unwrap();

        let mut other = sample_record();
        other.address = "0x0000000000000000000000000000000000000000".to_string();
        store.save(&other).unwrap();

        assert_eq!(store.load().unwrap(), other);
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_file_does_not_leak_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let stale = temp_dir.path().join(".wallet.json.tmp");
        fs::write(&stale, "leftover").unwrap();
        fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

        let store = WalletStore::new(temp_dir.path().join("wallet.json"));
        store.save(&sample_record()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap(), sample_record());
    }
}
