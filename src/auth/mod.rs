// Authentication: password hashing and bearer token management
// Author: Gabriel Demetrios Lafis

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Convenience result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Error type returned by authentication functions
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/password pair did not match a known user
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No usable bearer token in the request
    #[error("Missing or malformed authorization header")]
    MissingToken,

    /// Token unknown, revoked or past its expiry
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Authentication error: {0}")]
    Other(String),
}

/// Hash a password with a fresh random salt.
///
/// The stored form is `hex(salt)$hex(sha256(salt || password))`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);

    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Check a password against a stored salted hash
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(2, '$');

    let salt_hex = match parts.next() {
        Some(s) => s,
        None => return false,
    };
    let digest_hex = match parts.next() {
        Some(s) => s,
        None => return false,
    };

    let salt = match hex::decode(salt_hex) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    hex::encode(salted_digest(&salt, password)) == digest_hex
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

struct TokenEntry {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

/// In-memory store of opaque bearer tokens with a bounded lifetime
pub struct TokenManager {
    ttl: Duration,
    tokens: RwLock<HashMap<String, TokenEntry>>,
}

impl TokenManager {
    /// Create a token manager whose tokens live for the given number of minutes
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_ttl(Duration::minutes(ttl_minutes))
    }

    /// Create a token manager with an explicit token lifetime
    pub fn with_ttl(ttl: Duration) -> Self {
        TokenManager {
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh token for a user
    pub fn issue(&self, user_id: i64) -> AuthResult<String> {
        let mut raw = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw);
        let token = base64::encode_config(raw, base64::URL_SAFE_NO_PAD);

        let now = Utc::now();
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthError::Other("Failed to acquire write lock".to_string()))?;

        // Issuing is a convenient point to drop expired entries
        tokens.retain(|_, entry| entry.expires_at > now);

        tokens.insert(
            token.clone(),
            TokenEntry {
                user_id,
                expires_at: now + self.ttl,
            },
        );

        Ok(token)
    }

    /// Resolve a token to the user it was issued for
    pub fn authenticate(&self, token: &str) -> AuthResult<i64> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| AuthError::Other("Failed to acquire read lock".to_string()))?;

        match tokens.get(token) {
            Some(entry) if entry.expires_at > Utc::now() => Ok(entry.user_id),
            _ => Err(AuthError::InvalidToken),
        }
    }

    /// Drop a token, if present
    pub fn revoke(&self, token: &str) -> AuthResult<()> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthError::Other("Failed to acquire write lock".to_string()))?;

        tokens.remove(token);
        Ok(())
    }
}
