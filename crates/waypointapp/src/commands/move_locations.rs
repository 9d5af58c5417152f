use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, WaypointError};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::LocationView;

/// Moves the location shown at `from` to position `to` (both 1-based).
///
/// With a `filter`, positions refer to the filtered view and are mapped back to the
/// full collection by id.
pub fn run<B: KeyValueStore>(
    session: &mut Session<B>,
    from: usize,
    to: usize,
    filter: Option<&str>,
) -> Result<CmdResult> {
    if from == 0 || to == 0 {
        return Err(WaypointError::Api("Positions start at 1".to_string()));
    }

    let view = LocationView::filtered(session.collection.locations(), filter);
    let moved = view
        .entries
        .get(from - 1)
        .map(|e| e.location.title.clone())
        .unwrap_or_default();
    session
        .collection
        .reorder_in_view(&view.ids(), from - 1, to - 1)?;

    let after = LocationView::filtered(session.collection.locations(), filter);
    let mut result = CmdResult::default().with_listed_locations(after.entries);
    result.add_message(CmdMessage::success(format!(
        "Moved {} from {} to {}",
        moved, from, to
    )));
    Ok(result)
}
