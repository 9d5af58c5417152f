//! End-to-end scenarios over the filesystem store.

use std::fs;
use tempfile::TempDir;
use waypointapp::collection::Collection;
use waypointapp::commands::{create, import};
use waypointapp::draft::LocationDraft;
use waypointapp::geocode::Geocoder;
use waypointapp::model::{to_json, Coordinates, Location, LocationFields};
use waypointapp::session::{Session, StartupSource};
use waypointapp::store::fs_backend::FsBackend;
use waypointapp::store::{KeyValueStore, Persistence, KEY_LOCATIONS};

fn persistence(dir: &TempDir) -> Persistence<FsBackend> {
    Persistence::with_backend(FsBackend::new(dir.path().to_path_buf()))
}

fn loc(title: &str) -> Location {
    Location::new(LocationFields {
        title: title.into(),
        country: "Jordan".into(),
        description: "<p>x</p>".into(),
        image: String::new(),
        video: None,
        audio: None,
        coordinates: Coordinates::new(31.9, 35.9),
        questions: None,
        block_navigation: None,
    })
}

/// A geocoder that must not be reached.
struct Offline;

impl Geocoder for Offline {
    fn reverse(&self, _: Coordinates) -> waypointapp::error::Result<Option<String>> {
        Err(waypointapp::error::WaypointError::Geocode("offline".into()))
    }

    fn search(
        &self,
        _: &str,
    ) -> waypointapp::error::Result<Vec<waypointapp::geocode::PlaceCandidate>> {
        Err(waypointapp::error::WaypointError::Geocode("offline".into()))
    }
}

#[test]
fn corrupt_file_self_heals_on_startup() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("locations.json"), "{not json").unwrap();

    let session = Session::open_local(persistence(&dir)).unwrap();

    assert!(matches!(
        session.startup().source,
        StartupSource::Cleared { .. }
    ));
    assert!(session.collection.is_empty());
    assert!(!dir.path().join("locations.json").exists());

    // The next start is clean
    let session = Session::open_local(persistence(&dir)).unwrap();
    assert_eq!(session.startup().source, StartupSource::Empty);
}

#[test]
fn non_utf8_file_self_heals_on_startup() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("locations.json"), [0xff, 0xfe, b'[', b']']).unwrap();
    fs::write(dir.path().join("language.json"), [0xc3, 0x28]).unwrap();

    let session = Session::open_local(persistence(&dir)).unwrap();

    assert!(matches!(
        session.startup().source,
        StartupSource::Cleared { .. }
    ));
    assert!(session.collection.is_empty());
    assert!(!dir.path().join("locations.json").exists());
    assert_eq!(session.persistence().language().unwrap(), "en");
}

#[test]
fn mutations_survive_restart() {
    let dir = TempDir::new().unwrap();
    let mut collection = Collection::new(persistence(&dir));
    for title in ["A", "B", "C", "D"] {
        collection.insert(loc(title)).unwrap();
    }
    collection.reorder(0, 2).unwrap();
    let d = collection.locations()[3].id.clone();
    collection.delete(&d).unwrap();

    let session = Session::open_local(persistence(&dir)).unwrap();
    let titles: Vec<&str> = session
        .collection
        .locations()
        .iter()
        .map(|l| l.title.as_str())
        .collect();
    assert_eq!(titles, ["B", "C", "A"]);

    let on_disk = fs::read_to_string(dir.path().join("locations.json")).unwrap();
    assert_eq!(on_disk, to_json(session.collection.locations()).unwrap());
}

#[test]
fn import_missing_coordinates_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open_local(persistence(&dir)).unwrap();
    session.collection.insert(loc("Existing")).unwrap();
    let before = FsBackend::new(dir.path().to_path_buf())
        .load(KEY_LOCATIONS)
        .unwrap();

    let import_dir = TempDir::new().unwrap();
    let path = import_dir.path().join("import.json");
    let mut raw = serde_json::to_value(vec![loc("Petra")]).unwrap();
    raw[0].as_object_mut().unwrap().remove("coordinates");
    fs::write(&path, raw.to_string()).unwrap();

    let result = import::run(&mut session, &path).unwrap();

    assert!(result.has_errors());
    assert_eq!(session.collection.len(), 1);
    assert_eq!(
        FsBackend::new(dir.path().to_path_buf())
            .load(KEY_LOCATIONS)
            .unwrap(),
        before
    );
}

#[test]
fn petra_needs_a_description() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::open_local(persistence(&dir)).unwrap();
    let draft = |description: &str| LocationDraft {
        title: "Petra".into(),
        description: description.into(),
        coordinates: Some(Coordinates::new(31.9, 35.9)),
        country: Some("Jordan".into()),
        ..Default::default()
    };

    let refused = create::run(&mut session, &Offline, draft(""), None).unwrap();
    assert!(refused.has_errors());
    assert!(session.collection.is_empty());
    assert!(!dir.path().join("locations.json").exists());

    create::run(&mut session, &Offline, draft("<p>Rose city</p>"), None).unwrap();
    assert_eq!(session.collection.len(), 1);
    assert!(!session.collection.locations()[0].id.is_empty());
}
