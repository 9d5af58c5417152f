use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::LocationView;

/// What `run` would remove, so the caller can ask for confirmation.
pub fn preview<B: KeyValueStore>(session: &Session<B>) -> Result<CmdResult> {
    let view = LocationView::all(session.collection.locations());
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "This removes all {} location(s)",
        view.len()
    )));
    Ok(result.with_listed_locations(view.entries))
}

pub fn run<B: KeyValueStore>(session: &mut Session<B>) -> Result<CmdResult> {
    let count = session.collection.len();
    session.collection.clear()?;
    session.selection.clear();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Cleared {} location(s)",
        count
    )));
    Ok(result)
}
