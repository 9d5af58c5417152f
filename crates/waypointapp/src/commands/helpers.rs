use crate::commands::{CmdMessage, CmdResult};
use crate::draft::LocationDraft;
use crate::error::Result;
use crate::geocode::{Geocoder, Resolution};
use crate::model::Coordinates;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::{DisplayLocation, LocationRef, LocationView};

/// Where a pin should go.
#[derive(Debug, Clone, PartialEq)]
pub enum Pin {
    At(Coordinates),
    /// The top search result for this query.
    Place(String),
}

/// Resolves against the full, unfiltered collection.
pub fn resolve<B: KeyValueStore>(
    session: &Session<B>,
    selector: &LocationRef,
) -> Result<DisplayLocation> {
    let view = LocationView::all(session.collection.locations());
    view.resolve(selector).cloned()
}

/// Adds one error message per problem. Returns true if the draft can be submitted.
pub(crate) fn check_draft(draft: &LocationDraft, result: &mut CmdResult) -> bool {
    let problems = draft.problems();
    for problem in &problems {
        result.add_message(CmdMessage::error(problem.to_string()));
    }
    problems.is_empty()
}

/// Turns a pin into coordinates, searching when given a place name.
/// Returns `None` (with an error message) when nothing was found.
fn locate<G: Geocoder + ?Sized>(
    geocoder: &G,
    pin: &Pin,
    result: &mut CmdResult,
) -> Option<Coordinates> {
    let query = match pin {
        Pin::At(coordinates) => return Some(*coordinates),
        Pin::Place(query) => query,
    };

    match geocoder.search(query) {
        Ok(places) => match places.into_iter().next() {
            Some(top) => {
                result.add_message(CmdMessage::info(format!("Using place: {}", top.name)));
                Some(top.coordinates)
            }
            None => {
                result.add_message(CmdMessage::error(format!("No place found for '{}'", query)));
                None
            }
        },
        Err(e) => {
            result.add_message(CmdMessage::error(format!("Place search failed: {}", e)));
            None
        }
    }
}

/// Places the pin on the session's map and fills the draft's coordinates and country.
///
/// An explicit `country` skips reverse geocoding. Returns false when no coordinates
/// could be determined.
pub(crate) fn place_pin<B: KeyValueStore, G: Geocoder + ?Sized>(
    session: &mut Session<B>,
    geocoder: &G,
    pin: &Pin,
    country: Option<String>,
    draft: &mut LocationDraft,
    result: &mut CmdResult,
) -> bool {
    let editing = session.collection.is_editing();
    let Some(coordinates) = locate(geocoder, pin, result) else {
        return false;
    };

    match country {
        Some(country) => session.selection.restore(coordinates, country),
        None => match session.selection.pin(geocoder, coordinates, editing) {
            Resolution::Committed(country) => {
                result.add_message(CmdMessage::info(format!(
                    "Pinned at {} ({})",
                    coordinates, country
                )));
            }
            Resolution::Stale => {}
            Resolution::Unresolved { cleared, reason } => {
                let fallback = if cleared { "" } else { "; keeping the previous pin" };
                result.add_message(CmdMessage::warning(format!(
                    "Could not resolve a country for {}: {}{}",
                    coordinates, reason, fallback
                )));
            }
        },
    }

    draft.coordinates = session.selection.coordinates();
    if let Some(country) = session.selection.country() {
        draft.country = Some(country.to_string());
    } else if !editing {
        draft.country = None;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::fake::FakeGeocoder;
    use crate::geocode::PlaceCandidate;
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

    const PETRA: Coordinates = Coordinates(30.3285, 35.4444);

    fn session(backend: &MemBackend) -> Session<&MemBackend> {
        Session::open_local(Persistence::with_backend(backend)).unwrap()
    }

    #[test]
    fn place_pin_by_name_uses_top_result() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        let geocoder = FakeGeocoder::default()
            .with_places(
                "petra",
                vec![
                    PlaceCandidate {
                        name: "Petra, Jordan".into(),
                        coordinates: PETRA,
                    },
                    PlaceCandidate {
                        name: "Petra, Greece".into(),
                        coordinates: Coordinates::new(39.2, 26.2),
                    },
                ],
            )
            .with_country(PETRA, "Jordan");

        let mut draft = LocationDraft::default();
        let mut result = CmdResult::default();
        assert!(place_pin(
            &mut session,
            &geocoder,
            &Pin::Place("Petra".into()),
            None,
            &mut draft,
            &mut result
        ));
        assert_eq!(draft.coordinates, Some(PETRA));
        assert_eq!(draft.country.as_deref(), Some("Jordan"));
    }

    #[test]
    fn unknown_place_is_reported() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        let mut draft = LocationDraft::default();
        let mut result = CmdResult::default();
        assert!(!place_pin(
            &mut session,
            &FakeGeocoder::default(),
            &Pin::Place("Atlantis".into()),
            None,
            &mut draft,
            &mut result
        ));
        assert!(result.has_errors());
    }

    #[test]
    fn explicit_country_skips_reverse_lookup() {
        let backend = MemBackend::new();
        let mut session = session(&backend);
        let geocoder = FakeGeocoder::failing();
        let mut draft = LocationDraft::default();
        let mut result = CmdResult::default();
        assert!(place_pin(
            &mut session,
            &geocoder,
            &Pin::At(PETRA),
            Some("Jordan".into()),
            &mut draft,
            &mut result
        ));
        assert_eq!(*geocoder.calls.borrow(), 0);
        assert_eq!(draft.country.as_deref(), Some("Jordan"));
    }
}
