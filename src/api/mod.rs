// API module for exposing functionality via HTTP
// Author: Gabriel Demetrios Lafis

mod server;
mod routes;
mod handlers;
mod models;

pub use server::*;
pub use routes::*;
pub use handlers::*;
pub use models::*;

use std::error::Error;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use crate::auth::AuthError;
use crate::data::DataError;
use crate::query::QueryError;
use crate::storage::StorageError;

/// Represents an error in the API module
#[derive(Debug)]
pub enum ApiError {
    DataError(DataError),
    QueryError(QueryError),
    AuthError(AuthError),
    StorageError(StorageError),
    ValidationError(String),
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::DataError(err) => write!(f, "Data error: {}", err),
            ApiError::QueryError(err) => write!(f, "Query error: {}", err),
            ApiError::AuthError(err) => write!(f, "{}", err),
            ApiError::StorageError(err) => write!(f, "Storage error: {}", err),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl Error for ApiError {}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        ApiError::DataError(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::QueryError(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::AuthError(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::StorageError(err)
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DataError(_) => StatusCode::BAD_REQUEST,
            ApiError::QueryError(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthError(AuthError::Other(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::AuthError(_) => StatusCode::UNAUTHORIZED,
            ApiError::StorageError(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::StorageError(StorageError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
