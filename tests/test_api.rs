// HTTP API tests
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use csv_query_api::api::{configure, AppState};
use csv_query_api::auth::TokenManager;
use csv_query_api::storage::{MemoryUploadStore, Registry, StorageError, UploadStore};

const SAMPLE: &[u8] = b"a,b\n1,x\n2,y\n3,z\n";

fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Registry::in_memory(),
        Arc::new(MemoryUploadStore::new()),
        TokenManager::new(60),
    ))
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_register_login_upload_query_flow() {
    let state = test_state();
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    // Register
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "alice", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Duplicate username is a conflict
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "alice", "password": "other"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);

    // Login
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": "alice", "password": "secret"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // Upload
    let req = test::TestRequest::post()
        .uri("/api/v1/files/data.csv")
        .insert_header(bearer(&token))
        .set_payload(SAMPLE)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let file_id = body["file_id"].as_i64().unwrap();

    // Listing reports the inferred column metadata
    let req = test::TestRequest::get()
        .uri("/api/v1/files")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["filename"], "data.csv");
    assert_eq!(
        files[0]["columns"],
        json!([
            {"name": "a", "type": "integer"},
            {"name": "b", "type": "text"},
        ])
    );

    // Retrieval without parameters is a byte-identical passthrough
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/files/{}", file_id))
        .insert_header(bearer(&token))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body.as_ref(), SAMPLE);

    // Filter and sort together
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/files/{}?filter=a__gt__1&sort=a:false",
            file_id
        ))
        .insert_header(bearer(&token))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body.as_ref(), b"a,b\n3,z\n2,y\n".as_slice());
}

#[actix_web::test]
async fn test_requests_without_token_are_unauthorized() {
    let state = test_state();
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/v1/files").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/files/data.csv")
        .set_payload(SAMPLE)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_web::test]
async fn test_login_with_wrong_password() {
    let state = test_state();
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "alice", "password": "secret"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"username": "alice", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_web::test]
async fn test_upload_rejects_non_csv_extension() {
    let state = test_state();
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let token = authenticated_token(&state);

    let req = test::TestRequest::post()
        .uri("/api/v1/files/data.txt")
        .insert_header(bearer(&token))
        .set_payload(SAMPLE)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_bad_query_specs_are_rejected() {
    let state = test_state();
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let token = authenticated_token(&state);

    let req = test::TestRequest::post()
        .uri("/api/v1/files/data.csv")
        .insert_header(bearer(&token))
        .set_payload(SAMPLE)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let file_id = body["file_id"].as_i64().unwrap();

    // Wrong sort delimiter
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/files/{}?sort=a-true", file_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // Ordering operator against a text column
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/files/{}?filter=b__gt__1", file_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_file_of_another_user_reads_as_not_found() {
    let state = test_state();
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let alice = state.registry.create_user("alice", "hash").unwrap();
    let record = state
        .registry
        .record_file(alice.id, "data.csv", "1/data.csv")
        .unwrap();

    let bob = state.registry.create_user("bob", "hash").unwrap();
    let bob_token = state.tokens.issue(bob.id).unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/files/{}", record.id))
        .insert_header(bearer(&bob_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

mockall::mock! {
    Store {}

    impl UploadStore for Store {
        fn store(&self, user_id: i64, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;
        fn load(&self, path: &str) -> Result<Vec<u8>, StorageError>;
        fn exists(&self, path: &str) -> Result<bool, StorageError>;
        fn delete(&self, path: &str) -> Result<(), StorageError>;
    }
}

#[actix_web::test]
async fn test_unreadable_file_is_reported_in_listing() {
    let mut store = MockStore::new();
    store
        .expect_load()
        .returning(|_| Err(StorageError::Other("disk failure".to_string())));

    let state = web::Data::new(AppState::new(
        Registry::in_memory(),
        Arc::new(store),
        TokenManager::new(60),
    ));
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let user = state.registry.create_user("alice", "hash").unwrap();
    state
        .registry
        .record_file(user.id, "data.csv", "1/data.csv")
        .unwrap();
    let token = state.tokens.issue(user.id).unwrap();

    // The listing still succeeds, with the failure attached to the entry
    let req = test::TestRequest::get()
        .uri("/api/v1/files")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0]["columns"].as_array().unwrap().is_empty());
    assert!(files[0]["error"].as_str().unwrap().contains("data.csv"));

    // Direct retrieval of the same file is a server-side failure
    let req = test::TestRequest::get()
        .uri("/api/v1/files/1")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
}

fn authenticated_token(state: &web::Data<AppState>) -> String {
    let user = state
        .registry
        .create_user("tester", &csv_query_api::auth::hash_password("secret"))
        .unwrap();
    state.tokens.issue(user.id).unwrap()
}
