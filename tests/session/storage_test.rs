//! Persistence medium tests.

use smarthealth::session::{FileStorage, MemoryStorage, SessionStorage, StorageError};

#[test]
fn file_storage_round_trip_and_remove() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path().join("session"));

    assert_eq!(storage.get("smart_health_user").expect("get"), None);

    storage.set("smart_health_user", "{\"a\":1}").expect("set");
    assert_eq!(
        storage.get("smart_health_user").expect("get").as_deref(),
        Some("{\"a\":1}")
    );
    let path = storage.path_for("smart_health_user").expect("path");
    assert!(path.exists());

    storage.remove("smart_health_user").expect("remove");
    assert!(!path.exists());
    assert_eq!(storage.get("smart_health_user").expect("get"), None);
}

#[test]
fn file_storage_remove_missing_key_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path());
    assert!(storage.remove("never_written").is_ok());
}

#[test]
fn file_storage_overwrites_without_leftover_temp_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path());
    storage.set("k", "first").expect("set");
    storage.set("k", "second").expect("set");
    assert_eq!(storage.get("k").expect("get").as_deref(), Some("second"));

    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["k.json".to_owned()]);
}

#[cfg(unix)]
#[test]
fn file_storage_record_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path());
    storage.set("k", "v").expect("set");
    let path = storage.path_for("k").expect("path");
    let mode = std::fs::metadata(path).expect("metadata").permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn invalid_keys_are_rejected_by_both_backends() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = FileStorage::new(dir.path());
    let memory = MemoryStorage::new();
    let backends: [&dyn SessionStorage; 2] = [&file, &memory];
    for storage in backends {
        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }
}
