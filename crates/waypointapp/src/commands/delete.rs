use crate::commands::helpers::resolve;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::{DisplayLocation, LocationRef};

pub fn run<B: KeyValueStore>(session: &mut Session<B>, selector: &LocationRef) -> Result<CmdResult> {
    let target = resolve(session, selector)?;
    let was_editing = session
        .collection
        .editing()
        .is_some_and(|l| l.id == target.location.id);

    let mut result = CmdResult::default();
    if let Some(location) = session.collection.delete(&target.location.id)? {
        if was_editing {
            session.selection.clear();
        }
        result.add_message(CmdMessage::success(format!(
            "Location deleted ({}): {}",
            target.index, location.title
        )));
        result.affected_locations.push(DisplayLocation {
            index: target.index,
            location,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, Location, LocationFields};
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

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

    fn seeded(backend: &MemBackend) -> Session<&MemBackend> {
        Persistence::with_backend(backend)
            .save_locations(&[loc("Petra"), loc("Jerash"), loc("Amman")])
            .unwrap();
        Session::open_local(Persistence::with_backend(backend)).unwrap()
    }

    #[test]
    fn deletes_by_display_index() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);

        let result = run(&mut session, &LocationRef::Index(2)).unwrap();

        assert_eq!(result.affected_locations[0].location.title, "Jerash");
        let titles: Vec<&str> = session
            .collection
            .locations()
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, ["Petra", "Amman"]);
    }

    #[test]
    fn deleting_the_edited_location_ends_the_edit() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);
        let id = session.collection.locations()[0].id.clone();
        session.collection.begin_edit(&id).unwrap();
        session.selection.restore(Coordinates::new(31.9, 35.9), "Jordan");

        run(&mut session, &LocationRef::Id(id)).unwrap();

        assert!(!session.collection.is_editing());
        assert!(session.collection.editing().is_none());
        assert_eq!(session.selection.coordinates(), None);
    }

    #[test]
    fn missing_index_is_an_error() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);
        assert!(run(&mut session, &LocationRef::Index(4)).is_err());
        assert_eq!(session.collection.len(), 3);
    }
}
