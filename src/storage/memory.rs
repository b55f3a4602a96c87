// In-memory upload store, used by tests and the demo server
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{StorageError, UploadStore};

/// Upload store keeping file bytes in a shared map
pub struct MemoryUploadStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryUploadStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        MemoryUploadStore {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryUploadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStore for MemoryUploadStore {
    fn store(&self, user_id: i64, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = format!("{}/{}", user_id, filename);

        let mut files = self.files.write().map_err(|_| {
            StorageError::Other("Failed to acquire write lock".to_string())
        })?;

        files.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let files = self.files.read().map_err(|_| {
            StorageError::Other("Failed to acquire read lock".to_string())
        })?;

        files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let files = self.files.read().map_err(|_| {
            StorageError::Other("Failed to acquire read lock".to_string())
        })?;

        Ok(files.contains_key(path))
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        let mut files = self.files.write().map_err(|_| {
            StorageError::Other("Failed to acquire write lock".to_string())
        })?;

        if files.remove(path).is_none() {
            return Err(StorageError::NotFound(path.to_string()));
        }

        Ok(())
    }
}
