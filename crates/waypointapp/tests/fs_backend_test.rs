use std::fs;
use tempfile::TempDir;
use waypointapp::error::WaypointError;
use waypointapp::store::fs_backend::FsBackend;
use waypointapp::store::KeyValueStore;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    backend.save("locations", "[]").unwrap();
    assert_eq!(backend.load("locations").unwrap(), Some("[]".to_string()));

    backend.remove("locations").unwrap();
    assert_eq!(backend.load("locations").unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();

    backend.save("language", "en").unwrap();

    let expected_path = dir.path().join("language.json");
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "en");

    // Verify NO .tmp files are left behind
    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_overwrite_replaces_value() {
    let (_dir, backend) = setup();
    backend.save("tour_seen", "false").unwrap();
    backend.save("tour_seen", "true").unwrap();
    assert_eq!(backend.load("tour_seen").unwrap(), Some("true".to_string()));
}

#[test]
fn test_fs_backend_creates_missing_root() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let backend = FsBackend::new(nested.clone());

    assert_eq!(backend.load("locations").unwrap(), None);
    backend.save("locations", "[]").unwrap();
    assert!(nested.join("locations.json").exists());
}

#[test]
fn test_fs_backend_remove_absent_key_is_ok() {
    let (_dir, backend) = setup();
    backend.remove("locations").unwrap();
}

#[test]
fn test_fs_backend_rejects_path_like_keys() {
    let (_dir, backend) = setup();
    assert!(backend.save("../escape", "x").is_err());
    assert!(backend.save("", "x").is_err());
    assert!(backend.load("a/b").is_err());
}

#[test]
fn test_fs_backend_reports_non_utf8_as_corrupt() {
    let (dir, backend) = setup();
    fs::write(dir.path().join("locations.json"), [0xff, 0xfe, b'[', b']']).unwrap();

    assert!(matches!(
        backend.load("locations"),
        Err(WaypointError::Corrupt(_))
    ));
}
