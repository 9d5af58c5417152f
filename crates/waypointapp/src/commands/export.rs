use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::to_json_pretty;
use crate::session::Session;
use crate::store::KeyValueStore;
use std::fs;
use std::path::Path;

/// Writes the collection to `path` as a pretty-printed JSON array.
pub fn run<B: KeyValueStore>(session: &Session<B>, path: &Path) -> Result<CmdResult> {
    let json = to_json_pretty(session.collection.locations())?;
    fs::write(path, json)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} location(s) to {}",
        session.collection.len(),
        path.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, Location, LocationFields};
    use crate::schema::parse_collection;
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

    #[test]
    fn export_is_importable() {
        let petra = Location::new(LocationFields {
            title: "Petra".into(),
            country: "Jordan".into(),
            description: "<p>Rose city</p>".into(),
            image: String::new(),
            video: None,
            audio: Some("https://audio.example/petra.mp3".into()),
            coordinates: Coordinates::new(31.9, 35.9),
            questions: None,
            block_navigation: None,
        });
        let backend = MemBackend::new();
        Persistence::with_backend(&backend)
            .save_locations(std::slice::from_ref(&petra))
            .unwrap();
        let session = Session::open_local(Persistence::with_backend(&backend)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.json");
        run(&session, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"));
        assert_eq!(parse_collection(&text).unwrap(), vec![petra]);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let backend = MemBackend::new();
        let session = Session::open_local(Persistence::with_backend(&backend)).unwrap();
        assert!(run(&session, Path::new("/nonexistent/dir/out.json")).is_err());
    }
}
