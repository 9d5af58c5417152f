use crate::commands::helpers::resolve;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::{LocationRef, LocationView};

/// Lists the collection, optionally narrowed by a title/country query.
pub fn run<B: KeyValueStore>(session: &Session<B>, query: Option<&str>) -> Result<CmdResult> {
    let view = LocationView::filtered(session.collection.locations(), query);
    let mut result = CmdResult::default();

    if view.is_empty() {
        result.add_message(CmdMessage::info(match &view.query {
            Some(q) => format!("No locations match '{}'", q),
            None => "No locations yet. Add one with `waypoint add`.".to_string(),
        }));
    }
    Ok(result.with_listed_locations(view.entries))
}

/// A single location, for the detail view.
pub fn show<B: KeyValueStore>(session: &Session<B>, selector: &LocationRef) -> Result<CmdResult> {
    let entry = resolve(session, selector)?;
    Ok(CmdResult::default().with_listed_locations(vec![entry]))
}
