// API request and response models
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use crate::data::ColumnInfo;

/// Request to register a new user
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request to log in
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response carrying a freshly issued bearer token
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// One entry of the file listing, with introspected column metadata
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub file_id: i64,
    pub filename: String,
    pub columns: Vec<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Optional query parameters of a file retrieval
#[derive(Debug, Clone, Deserialize)]
pub struct FileQuery {
    pub filter: Option<String>,
    pub sort: Option<String>,
}
