//! File-backed key-value store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, validate_key};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a reader never observes a partially written record. A failed
/// write removes its temporary file and leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let mut tmp = TempFile {
            path: path.with_extension("json.tmp"),
            armed: true,
        };

        let mut file = fs::File::create(&tmp.path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp.path, &path)?;
        tmp.armed = false;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Removes the file at `path` when dropped while still armed.
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::open(dir.path())
            .unwrap()
            .set("cart", "{\"items\":[]}")
            .unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("{\"items\":[]}"));
        assert!(!dir.path().join("cart.json.tmp").exists());
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("cart", "first").unwrap();
        store.set("cart", "second").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("cart", "x").unwrap();
        store.remove("cart").unwrap();
        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_failed_rename_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("wishlist", "kept").unwrap();

        // A non-empty directory at the target path makes the rename fail.
        let target = dir.path().join("cart.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupant"), "x").unwrap();

        assert!(matches!(store.set("cart", "new"), Err(StorageError::Io(_))));
        assert!(!dir.path().join("cart.json.tmp").exists());
        assert!(target.join("occupant").exists());
        assert_eq!(store.get("wishlist").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_failed_write_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("cart", "previous").unwrap();

        // A directory where the temp file belongs makes the create fail.
        fs::create_dir(dir.path().join("cart.json.tmp")).unwrap();
        assert!(store.set("cart", "next").is_err());
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("previous"));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
