// Storage tests
// Author: Gabriel Demetrios Lafis

use csv_query_api::storage::{
    DiskUploadStore, MemoryUploadStore, Registry, StorageError, UploadStore,
};

#[test]
fn test_disk_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskUploadStore::new(dir.path()).unwrap();

    let path = store.store(7, "data.csv", b"a,b\n1,2\n").unwrap();

    assert!(path.contains('7'));
    assert!(store.exists(&path).unwrap());
    assert_eq!(store.load(&path).unwrap(), b"a,b\n1,2\n".to_vec());

    store.delete(&path).unwrap();
    assert!(!store.exists(&path).unwrap());
}

#[test]
fn test_disk_store_overwrites_same_filename() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskUploadStore::new(dir.path()).unwrap();

    let first = store.store(1, "data.csv", b"a\n1\n").unwrap();
    let second = store.store(1, "data.csv", b"a\n2\n").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.load(&second).unwrap(), b"a\n2\n".to_vec());
}

#[test]
fn test_disk_store_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskUploadStore::new(dir.path()).unwrap();

    let missing = dir.path().join("nope.csv");
    let err = store.load(&missing.to_string_lossy()).unwrap_err();

    assert!(matches!(err, StorageError::NotFound(_)));
}

#[test]
fn test_memory_store_round_trip() {
    let store = MemoryUploadStore::new();

    let path = store.store(3, "data.csv", b"x\n").unwrap();

    assert!(store.exists(&path).unwrap());
    assert_eq!(store.load(&path).unwrap(), b"x\n".to_vec());

    store.delete(&path).unwrap();
    assert!(matches!(
        store.load(&path).unwrap_err(),
        StorageError::NotFound(_)
    ));
}

#[test]
fn test_registry_rejects_duplicate_username() {
    let registry = Registry::in_memory();

    registry.create_user("alice", "hash").unwrap();
    let err = registry.create_user("alice", "other").unwrap_err();

    assert!(matches!(err, StorageError::AlreadyExists(_)));
}

#[test]
fn test_registry_file_ownership() {
    let registry = Registry::in_memory();

    let alice = registry.create_user("alice", "hash").unwrap();
    let bob = registry.create_user("bob", "hash").unwrap();

    let record = registry
        .record_file(alice.id, "data.csv", "/uploads/1/data.csv")
        .unwrap();

    // Bob cannot see Alice's file
    assert!(registry.find_file(record.id, bob.id).unwrap().is_none());
    assert!(registry.find_file(record.id, alice.id).unwrap().is_some());
    assert_eq!(registry.files_for_user(bob.id).unwrap().len(), 0);
}

#[test]
fn test_registry_reupload_keeps_single_record() {
    let registry = Registry::in_memory();
    let user = registry.create_user("alice", "hash").unwrap();

    let first = registry
        .record_file(user.id, "data.csv", "/uploads/1/data.csv")
        .unwrap();
    let second = registry
        .record_file(user.id, "data.csv", "/uploads/1/data.csv")
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(registry.files_for_user(user.id).unwrap().len(), 1);
}

#[test]
fn test_registry_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");

    {
        let registry = Registry::open(&path).unwrap();
        let user = registry.create_user("alice", "hash").unwrap();
        registry
            .record_file(user.id, "data.csv", "/uploads/1/data.csv")
            .unwrap();
    }

    let reopened = Registry::open(&path).unwrap();
    let user = reopened.find_user_by_name("alice").unwrap().unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(reopened.files_for_user(user.id).unwrap().len(), 1);

    // Ids keep counting up after a restart
    let other = reopened.create_user("bob", "hash").unwrap();
    assert!(other.id > user.id);
}
