// Authentication tests
// Author: Gabriel Demetrios Lafis

use chrono::Duration;

use csv_query_api::auth::{hash_password, verify_password, AuthError, TokenManager};

#[test]
fn test_password_round_trip() {
    let stored = hash_password("secret");

    assert!(verify_password("secret", &stored));
    assert!(!verify_password("wrong", &stored));
}

#[test]
fn test_hash_is_salted() {
    // Same password, different salt, different stored form
    let first = hash_password("secret");
    let second = hash_password("secret");

    assert_ne!(first, second);
    assert!(verify_password("secret", &first));
    assert!(verify_password("secret", &second));
}

#[test]
fn test_verify_rejects_garbage_stored_form() {
    assert!(!verify_password("secret", "not-a-stored-hash"));
    assert!(!verify_password("secret", "zz$zz"));
}

#[test]
fn test_token_round_trip() {
    let tokens = TokenManager::new(60);

    let token = tokens.issue(42).unwrap();

    assert_eq!(tokens.authenticate(&token).unwrap(), 42);
}

#[test]
fn test_unknown_token_is_rejected() {
    let tokens = TokenManager::new(60);

    assert!(matches!(
        tokens.authenticate("no-such-token").unwrap_err(),
        AuthError::InvalidToken
    ));
}

#[test]
fn test_expired_token_is_rejected() {
    let tokens = TokenManager::with_ttl(Duration::seconds(-1));

    let token = tokens.issue(42).unwrap();

    assert!(matches!(
        tokens.authenticate(&token).unwrap_err(),
        AuthError::InvalidToken
    ));
}

#[test]
fn test_revoked_token_is_rejected() {
    let tokens = TokenManager::new(60);

    let token = tokens.issue(42).unwrap();
    tokens.revoke(&token).unwrap();

    assert!(tokens.authenticate(&token).is_err());
}

#[test]
fn test_tokens_are_unique_per_issue() {
    let tokens = TokenManager::new(60);

    let first = tokens.issue(1).unwrap();
    let second = tokens.issue(1).unwrap();

    assert_ne!(first, second);
}
