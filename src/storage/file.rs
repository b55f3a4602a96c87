// Disk-backed upload store: one directory per user
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::{Path, PathBuf};

use super::{StorageError, UploadStore};

/// Upload store writing files under `<base_dir>/<user id>/<filename>`
pub struct DiskUploadStore {
    base_dir: PathBuf,
}

impl DiskUploadStore {
    /// Create a new disk store, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
        }

        Ok(DiskUploadStore { base_dir })
    }
}

impl UploadStore for DiskUploadStore {
    fn store(&self, user_id: i64, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let mut dir = self.base_dir.clone();
        dir.push(user_id.to_string());
        fs::create_dir_all(&dir)?;

        let path = dir.join(filename);
        fs::write(&path, bytes)?;

        Ok(path.to_string_lossy().to_string())
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(err) => Err(StorageError::IoError(err)),
        }
    }

    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(Path::new(path).is_file())
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        if !Path::new(path).is_file() {
            return Err(StorageError::NotFound(path.to_string()));
        }

        fs::remove_file(path)?;
        Ok(())
    }
}
