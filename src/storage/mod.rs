// Storage module for uploaded files and account metadata
// Author: Gabriel Demetrios Lafis

mod file;
mod memory;
mod registry;

pub use file::*;
pub use memory::*;
pub use registry::*;

use std::error::Error;
use std::fmt;

/// Represents a store for raw uploaded file bytes
pub trait UploadStore {
    /// Store a file's bytes for a user, returning the storage path
    fn store(&self, user_id: i64, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Load a file's bytes by storage path
    fn load(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Check if a storage path holds a file
    fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete a file by storage path
    fn delete(&self, path: &str) -> Result<(), StorageError>;
}

/// Represents an error in the storage module
#[derive(Debug)]
pub enum StorageError {
    IoError(std::io::Error),
    NotFound(String),
    AlreadyExists(String),
    InvalidFormat(String),
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorageError::IoError(err) => write!(f, "IO error: {}", err),
            StorageError::NotFound(name) => write!(f, "'{}' not found", name),
            StorageError::AlreadyExists(name) => write!(f, "'{}' already exists", name),
            StorageError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            StorageError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IoError(err)
    }
}
