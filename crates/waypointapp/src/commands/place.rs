use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::geocode::Geocoder;

/// Place search. Failures are reported, never raised.
pub fn search<G: Geocoder + ?Sized>(geocoder: &G, query: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let query = query.trim();
    if query.is_empty() {
        result.add_message(CmdMessage::error("Enter a place to search for"));
        return Ok(result);
    }

    match geocoder.search(query) {
        Ok(places) if places.is_empty() => {
            result.add_message(CmdMessage::info(format!("No places found for '{}'", query)));
        }
        Ok(places) => result.places = places,
        Err(e) => result.add_message(CmdMessage::error(format!("Place search failed: {}", e))),
    }
    Ok(result)
}
