use crate::commands::helpers::{check_draft, place_pin, Pin};
use crate::commands::{CmdMessage, CmdResult};
use crate::draft::LocationDraft;
use crate::error::Result;
use crate::geocode::Geocoder;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::DisplayLocation;

/// Adds a location built from `draft`, placing `pin` first when given.
///
/// When a pin is given, `draft.country` acts as an explicit country and skips reverse
/// geocoding. A draft with problems is refused with one error message per problem.
pub fn run<B: KeyValueStore, G: Geocoder + ?Sized>(
    session: &mut Session<B>,
    geocoder: &G,
    mut draft: LocationDraft,
    pin: Option<Pin>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if let Some(pin) = &pin {
        let country = draft.country.take();
        if !place_pin(session, geocoder, pin, country, &mut draft, &mut result) {
            return Ok(result);
        }
    }

    if !check_draft(&draft, &mut result) {
        result.add_message(CmdMessage::warning("Location not saved"));
        return Ok(result);
    }

    let location = draft.into_location()?;
    session.collection.insert(location.clone())?;
    session.selection.clear();

    let index = session.collection.len();
    result.add_message(CmdMessage::success(format!(
        "Location added ({}): {}",
        index, location.title
    )));
    result.affected_locations.push(DisplayLocation { index, location });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftError;
    use crate::geocode::fake::FakeGeocoder;
    use crate::model::Coordinates;
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

    const PETRA: Coordinates = Coordinates(31.9, 35.9);

    fn session(backend: &MemBackend) -> Session<&MemBackend> {
        Session::open_local(Persistence::with_backend(backend)).unwrap()
    }

    fn petra(description: &str) -> LocationDraft {
        LocationDraft {
            title: "Petra".into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[test]
    fn blank_description_is_refused_without_mutation() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        let geocoder = FakeGeocoder::default().with_country(PETRA, "Jordan");

        let result = run(&mut session, &geocoder, petra(""), Some(Pin::At(PETRA))).unwrap();

        assert!(result.has_errors());
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == DraftError::MissingDescription.to_string()));
        assert!(session.collection.is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn described_location_is_added_once_with_fresh_id() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        let geocoder = FakeGeocoder::default().with_country(PETRA, "Jordan");

        let result = run(
            &mut session,
            &geocoder,
            petra("<p>Rose city</p>"),
            Some(Pin::At(PETRA)),
        )
        .unwrap();

        assert!(!result.has_errors());
        assert_eq!(session.collection.len(), 1);
        let added = &session.collection.locations()[0];
        assert_eq!(added.title, "Petra");
        assert_eq!(added.country, "Jordan");
        assert_eq!(added.coordinates, PETRA);
        assert!(!added.id.is_empty());
        assert_eq!(result.affected_locations[0].index, 1);
        assert_eq!(session.selection.coordinates(), None);
    }

    #[test]
    fn geocoder_failure_clears_pin_and_refuses() {
        let backend = MemBackend::new();
        let mut session = session(&backend);

        let result = run(
            &mut session,
            &FakeGeocoder::failing(),
            petra("<p>Rose city</p>"),
            Some(Pin::At(PETRA)),
        )
        .unwrap();

        assert!(result.has_errors());
        assert_eq!(session.selection.coordinates(), None);
        assert!(session.collection.is_empty());
    }

    #[test]
    fn explicit_country_needs_no_geocoder() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        let mut draft = petra("<p>Rose city</p>");
        draft.country = Some("Jordan".into());

        run(
            &mut session,
            &FakeGeocoder::failing(),
            draft,
            Some(Pin::At(PETRA)),
        )
        .unwrap();
        assert_eq!(session.collection.locations()[0].country, "Jordan");
    }

    #[test]
    fn persist_failure_leaves_collection_unchanged() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        backend.set_simulate_write_error(true);
        let geocoder = FakeGeocoder::default().with_country(PETRA, "Jordan");

        let outcome = run(
            &mut session,
            &geocoder,
            petra("<p>Rose city</p>"),
            Some(Pin::At(PETRA)),
        );
        assert!(outcome.is_err());
        assert!(session.collection.is_empty());
    }
}
