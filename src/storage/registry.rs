// Registry of user accounts and uploaded-file metadata
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::StorageError;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Metadata for one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub path: String,
    pub user_id: i64,
    pub uploaded_at: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryData {
    next_user_id: i64,
    next_file_id: i64,
    users: Vec<UserRecord>,
    files: Vec<FileRecord>,
}

/// Store of users and file records, optionally persisted as a JSON file.
///
/// Every mutation rewrites the backing file before returning, so a
/// restarted server sees the same accounts and uploads.
pub struct Registry {
    path: Option<PathBuf>,
    data: RwLock<RegistryData>,
}

impl Registry {
    /// Create a registry with no backing file
    pub fn in_memory() -> Self {
        Registry {
            path: None,
            data: RwLock::new(RegistryData::default()),
        }
    }

    /// Open a registry backed by a JSON file, loading it when present
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)
                .map_err(|e| StorageError::InvalidFormat(e.to_string()))?
        } else {
            RegistryData::default()
        };

        Ok(Registry {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Create a user, rejecting a duplicate username
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StorageError> {
        let mut data = self.write_lock()?;

        if data.users.iter().any(|u| u.username == username) {
            return Err(StorageError::AlreadyExists(username.to_string()));
        }

        data.next_user_id += 1;
        let user = UserRecord {
            id: data.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };

        data.users.push(user.clone());
        self.persist(&data)?;

        Ok(user)
    }

    /// Find a user by username
    pub fn find_user_by_name(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let data = self.read_lock()?;
        Ok(data.users.iter().find(|u| u.username == username).cloned())
    }

    /// Record an upload, replacing any earlier record for the same
    /// filename of the same user
    pub fn record_file(
        &self,
        user_id: i64,
        filename: &str,
        path: &str,
    ) -> Result<FileRecord, StorageError> {
        let mut data = self.write_lock()?;

        if let Some(existing) = data
            .files
            .iter_mut()
            .find(|f| f.user_id == user_id && f.filename == filename)
        {
            existing.path = path.to_string();
            existing.uploaded_at = Utc::now().timestamp();
            let record = existing.clone();
            self.persist(&data)?;
            return Ok(record);
        }

        data.next_file_id += 1;
        let record = FileRecord {
            id: data.next_file_id,
            filename: filename.to_string(),
            path: path.to_string(),
            user_id,
            uploaded_at: Utc::now().timestamp(),
        };

        data.files.push(record.clone());
        self.persist(&data)?;

        Ok(record)
    }

    /// List the files owned by a user, in upload order
    pub fn files_for_user(&self, user_id: i64) -> Result<Vec<FileRecord>, StorageError> {
        let data = self.read_lock()?;
        Ok(data
            .files
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    /// Find one file by id, scoped to its owner
    pub fn find_file(&self, id: i64, user_id: i64) -> Result<Option<FileRecord>, StorageError> {
        let data = self.read_lock()?;
        Ok(data
            .files
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .cloned())
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<RegistryData>, StorageError> {
        self.data
            .read()
            .map_err(|_| StorageError::Other("Failed to acquire read lock".to_string()))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<RegistryData>, StorageError> {
        self.data
            .write()
            .map_err(|_| StorageError::Other("Failed to acquire write lock".to_string()))
    }

    fn persist(&self, data: &RegistryData) -> Result<(), StorageError> {
        if let Some(path) = &self.path {
            let contents = serde_json::to_string_pretty(data)
                .map_err(|e| StorageError::Other(e.to_string()))?;
            fs::write(path, contents)?;
        }

        Ok(())
    }
}
