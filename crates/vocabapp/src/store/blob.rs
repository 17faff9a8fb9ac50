use crate::error::{Result, VocabError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Raw key/value storage for serialized blobs.
/// Synchronous: local access never interleaves with other work.
pub trait BlobStorage: Send + Sync {
    /// Returns Ok(None) if nothing was ever stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value. MUST be atomic: a reader sees the old blob or the new one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key under `root`.
pub struct FsBlobStorage {
    root: PathBuf,
}

impl FsBlobStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(VocabError::Io)?;
        }
        Ok(())
    }
}

impl BlobStorage for FsBlobStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(VocabError::Io)?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let tmp_file = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_file, value).map_err(VocabError::Io)?;
        fs::rename(&tmp_file, self.path_for(key)).map_err(VocabError::Io)?;
        Ok(())
    }
}

/// In-memory blob storage for testing.
#[derive(Default)]
pub struct MemBlobStorage {
    blobs: Mutex<HashMap<String, String>>,
    simulate_write_error: Mutex<bool>,
}

impl MemBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        if let Ok(mut flag) = self.simulate_write_error.lock() {
            *flag = simulate;
        }
    }

    /// Put a raw value in place, bypassing serialization. Useful to plant
    /// legacy or corrupt data.
    pub fn put_raw(&self, key: &str, value: &str) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), value.to_string());
        }
    }
}

impl BlobStorage for MemBlobStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.lock().map_err(|_| poisoned())?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.lock().map_err(|_| poisoned())? {
            return Err(VocabError::Store("Simulated write error".to_string()));
        }
        let mut blobs = self.blobs.lock().map_err(|_| poisoned())?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn poisoned() -> VocabError {
    VocabError::Store("blob storage lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_get_missing_is_none() {
        let blobs = MemBlobStorage::new();
        assert_eq!(blobs.get("nope").unwrap(), None);
    }

    #[test]
    fn test_mem_set_then_get() {
        let blobs = MemBlobStorage::new();
        blobs.set("k", "[1,2]").unwrap();
        assert_eq!(blobs.get("k").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_mem_simulated_write_error() {
        let blobs = MemBlobStorage::new();
        blobs.set_simulate_write_error(true);
        let err = blobs.set("k", "v").unwrap_err();
        assert!(err.is_backend_failure());
        blobs.set_simulate_write_error(false);
        blobs.set("k", "v").unwrap();
    }

    #[test]
    fn test_fs_creates_dir_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let blobs = FsBlobStorage::new(&root);

        assert_eq!(blobs.get("vocabulary_list").unwrap(), None);
        blobs.set("vocabulary_list", "[]").unwrap();
        blobs.set("vocabulary_list", "[ ]").unwrap();

        assert_eq!(
            blobs.get("vocabulary_list").unwrap().as_deref(),
            Some("[ ]")
        );
        let entries: Vec<_> = fs::read_dir(&root).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(blobs.path_for("vocabulary_list").exists());
    }
}
