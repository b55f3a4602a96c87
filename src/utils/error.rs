// Error handling utilities
// Author: Gabriel Demetrios Lafis

use std::error::Error;
use std::fmt;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::data::DataError;
use crate::query::QueryError;
use crate::storage::StorageError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Data(DataError),
    Query(QueryError),
    Auth(AuthError),
    Storage(StorageError),
    Api(ApiError),
    Config(String),
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Data(err) => write!(f, "Data error: {}", err),
            AppError::Query(err) => write!(f, "Query error: {}", err),
            AppError::Auth(err) => write!(f, "Auth error: {}", err),
            AppError::Storage(err) => write!(f, "Storage error: {}", err),
            AppError::Api(err) => write!(f, "API error: {}", err),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl Error for AppError {}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::Data(err)
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Query(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Api(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

/// Result type alias for AppError
pub type AppResult<T> = Result<T, AppError>;
