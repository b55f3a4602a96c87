// Validation utilities for client-supplied names and credentials
// Author: Gabriel Demetrios Lafis

/// Reduce a client-supplied filename to a safe path component.
///
/// Directory parts are stripped and anything outside `[A-Za-z0-9._-]`
/// is dropped, so the result can be joined onto an upload directory
/// without escaping it.
pub fn sanitize_filename(filename: &str) -> Result<String, String> {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(format!("Invalid filename '{}'", filename));
    }

    Ok(cleaned)
}

/// Validate that a filename carries the .csv extension
pub fn validate_csv_extension(filename: &str) -> Result<(), String> {
    if filename.to_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err("Invalid file format. Only CSV files are allowed.".to_string())
    }
}

/// Validate a username: non-empty, bounded, word characters only
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    if username.len() > 128 {
        return Err("Username cannot exceed 128 characters".to_string());
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err("Username contains invalid characters".to_string());
    }

    Ok(())
}

/// Validate a password: non-empty and bounded
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }

    if password.len() > 128 {
        return Err("Password cannot exceed 128 characters".to_string());
    }

    Ok(())
}
