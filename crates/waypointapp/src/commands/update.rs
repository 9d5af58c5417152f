use crate::commands::helpers::{check_draft, place_pin, resolve, Pin};
use crate::commands::{CmdMessage, CmdResult};
use crate::draft::LocationDraft;
use crate::error::Result;
use crate::geocode::Geocoder;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::{DisplayLocation, LocationRef};

/// Field changes for an edit. `None` keeps the current value.
///
/// For `video` and `audio`, an empty string removes the link.
#[derive(Debug, Clone, Default)]
pub struct LocationEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub audio: Option<String>,
    pub country: Option<String>,
    pub pin: Option<Pin>,
}

fn optional_link(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

pub fn run<B: KeyValueStore, G: Geocoder + ?Sized>(
    session: &mut Session<B>,
    geocoder: &G,
    selector: &LocationRef,
    edit: LocationEdit,
) -> Result<CmdResult> {
    let target = resolve(session, selector)?;
    let id = target.location.id.clone();
    let mut result = CmdResult::default();

    let current = session.collection.begin_edit(&id)?.clone();
    session
        .selection
        .restore(current.coordinates, current.country.clone());

    let mut draft = LocationDraft::from_location(&current);
    if let Some(title) = edit.title {
        draft.title = title;
    }
    if let Some(description) = edit.description {
        draft.description = description;
    }
    if let Some(image) = edit.image {
        draft.image = image;
    }
    if let Some(video) = edit.video {
        draft.video = optional_link(video);
    }
    if let Some(audio) = edit.audio {
        draft.audio = optional_link(audio);
    }

    match &edit.pin {
        Some(pin) => {
            if !place_pin(session, geocoder, pin, edit.country, &mut draft, &mut result) {
                session.collection.cancel_edit();
                return Ok(result);
            }
        }
        None => {
            if let Some(country) = edit.country {
                draft.country = Some(country);
            }
        }
    }

    if !check_draft(&draft, &mut result) {
        session.collection.cancel_edit();
        result.add_message(CmdMessage::warning("Location not saved"));
        return Ok(result);
    }

    let fields = draft.into_replacement()?;
    let updated = session.collection.update(&id, fields);
    session.collection.cancel_edit();
    session.selection.clear();
    updated?;

    if let Some(location) = session.collection.get(&id).cloned() {
        result.add_message(CmdMessage::success(format!(
            "Location updated ({}): {}",
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
    use crate::commands::create;
    use crate::geocode::fake::FakeGeocoder;
    use crate::model::Coordinates;
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

    const PETRA: Coordinates = Coordinates(31.9, 35.9);
    const WADI_RUM: Coordinates = Coordinates(29.57, 35.42);

    fn seeded(backend: &MemBackend) -> Session<&MemBackend> {
        let mut session = Session::open_local(Persistence::with_backend(backend)).unwrap();
        let draft = LocationDraft {
            title: "Petra".into(),
            description: "<p>Rose city</p>".into(),
            video: Some("https://video.example/petra".into()),
            country: Some("Jordan".into()),
            ..Default::default()
        };
        create::run(&mut session, &FakeGeocoder::default(), draft, Some(Pin::At(PETRA))).unwrap();
        session
    }

    #[test]
    fn edit_replaces_fields_and_keeps_id() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);
        let id = session.collection.locations()[0].id.clone();

        let result = run(
            &mut session,
            &FakeGeocoder::default(),
            &LocationRef::Index(1),
            LocationEdit {
                title: Some("Petra by night".into()),
                video: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!result.has_errors());
        let updated = &session.collection.locations()[0];
        assert_eq!(updated.id, id);
        assert_eq!(updated.title, "Petra by night");
        assert_eq!(updated.video, None);
        assert_eq!(updated.country, "Jordan");
        assert!(!session.collection.is_editing());
    }

    #[test]
    fn moving_pin_resolves_new_country() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);
        let geocoder = FakeGeocoder::default().with_country(WADI_RUM, "Jordan (Aqaba)");

        run(
            &mut session,
            &geocoder,
            &LocationRef::Index(1),
            LocationEdit {
                pin: Some(Pin::At(WADI_RUM)),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = &session.collection.locations()[0];
        assert_eq!(updated.coordinates, WADI_RUM);
        assert_eq!(updated.country, "Jordan (Aqaba)");
    }

    #[test]
    fn geocoder_failure_during_edit_keeps_previous_pin() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);

        let result = run(
            &mut session,
            &FakeGeocoder::failing(),
            &LocationRef::Index(1),
            LocationEdit {
                title: Some("Petra by night".into()),
                pin: Some(Pin::At(WADI_RUM)),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!result.has_errors());
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("keeping the previous pin")));
        let updated = &session.collection.locations()[0];
        assert_eq!(updated.title, "Petra by night");
        assert_eq!(updated.coordinates, PETRA);
        assert_eq!(updated.country, "Jordan");
    }

    #[test]
    fn blanking_description_is_refused() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);
        let before = session.collection.locations().to_vec();

        let result = run(
            &mut session,
            &FakeGeocoder::default(),
            &LocationRef::Index(1),
            LocationEdit {
                description: Some("<p><br></p>".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(result.has_errors());
        assert_eq!(session.collection.locations(), &before[..]);
        assert!(!session.collection.is_editing());
    }

    #[test]
    fn unknown_selector_is_an_error() {
        let backend = MemBackend::new();
        let mut session = seeded(&backend);
        assert!(run(
            &mut session,
            &FakeGeocoder::default(),
            &LocationRef::Index(5),
            LocationEdit::default(),
        )
        .is_err());
    }
}
