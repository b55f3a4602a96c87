// API request handlers
// Author: Gabriel Demetrios Lafis

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{info, warn};
use serde_json::json;

use crate::auth::{self, AuthError};
use crate::data;
use crate::query::run_query;
use crate::storage::StorageError;
use crate::utils::{
    sanitize_filename, validate_csv_extension, validate_password, validate_username,
};
use super::{models::*, ApiError, AppState};

/// Register a new user
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();

    validate_username(&req.username).map_err(ApiError::ValidationError)?;
    validate_password(&req.password).map_err(ApiError::ValidationError)?;

    let password_hash = auth::hash_password(&req.password);

    match state.registry.create_user(&req.username, &password_hash) {
        Ok(user) => {
            info!("Registered user '{}'", user.username);

            Ok(HttpResponse::Ok().json(json!({
                "message": "User registered successfully",
            })))
        }
        Err(StorageError::AlreadyExists(_)) => Err(ApiError::Conflict(
            "User with that username already exists".to_string(),
        )),
        Err(err) => Err(ApiError::from(err)),
    }
}

/// Authenticate a user and issue an access token
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();

    let user = state.registry.find_user_by_name(&req.username)?;

    let user = match user {
        Some(user) if auth::verify_password(&req.password, &user.password_hash) => user,
        _ => return Err(ApiError::AuthError(AuthError::InvalidCredentials)),
    };

    let access_token = state.tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

/// Upload a CSV file for the authenticated user
pub async fn upload_file(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    let user_id = authenticated_user(&state, &request)?;

    let filename = sanitize_filename(&path.into_inner()).map_err(ApiError::ValidationError)?;
    validate_csv_extension(&filename).map_err(ApiError::ValidationError)?;

    if body.is_empty() {
        return Err(ApiError::ValidationError("No file provided".to_string()));
    }

    let stored_path = state.uploads.store(user_id, &filename, &body)?;
    let record = state.registry.record_file(user_id, &filename, &stored_path)?;

    info!(
        "Stored file '{}' ({} bytes) for user {}",
        record.filename,
        body.len(),
        user_id
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "File uploaded successfully",
        "file_id": record.id,
    })))
}

/// List the authenticated user's files with their column metadata
pub async fn list_files(
    state: web::Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, ApiError> {
    let user_id = authenticated_user(&state, &request)?;

    let records = state.registry.files_for_user(user_id)?;
    let mut files = Vec::with_capacity(records.len());

    for record in records {
        let columns = state
            .uploads
            .load(&record.path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| data::introspect(&bytes).map_err(|e| e.to_string()));

        // A file that no longer parses is reported, not fatal to the listing
        match columns {
            Ok(columns) => files.push(FileSummary {
                file_id: record.id,
                filename: record.filename,
                columns,
                error: None,
            }),
            Err(message) => {
                warn!(
                    "Failed to read columns from '{}': {}",
                    record.filename, message
                );

                files.push(FileSummary {
                    file_id: record.id,
                    filename: record.filename.clone(),
                    columns: Vec::new(),
                    error: Some(format!(
                        "Error reading columns from file '{}': {}",
                        record.filename, message
                    )),
                });
            }
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "files": files })))
}

/// Return one file's contents, optionally filtered and sorted
pub async fn get_file(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<FileQuery>,
) -> Result<impl Responder, ApiError> {
    let user_id = authenticated_user(&state, &request)?;
    let file_id = path.into_inner();

    let record = state
        .registry
        .find_file(file_id, user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("File '{}' not found", file_id)))?;

    let bytes = state.uploads.load(&record.path)?;

    let params = query.into_inner();
    let result = run_query(&bytes, params.filter.as_deref(), params.sort.as_deref())?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(result))
}

/// Resolve the request's bearer token to a user id
fn authenticated_user(state: &AppState, request: &HttpRequest) -> Result<i64, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::AuthError(AuthError::MissingToken))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::AuthError(AuthError::MissingToken))?;

    Ok(state.tokens.authenticate(token)?)
}
