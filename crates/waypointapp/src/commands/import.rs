//! Import replaces the whole collection from a JSON file.
//!
//! The file is validated in full before anything changes: one bad record rejects the
//! entire import. [`preview`] shows what would be loaded so the UI can confirm;
//! [`run`] re-reads and applies it.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Location;
use crate::schema::{parse_collection, CollectionError};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::LocationView;
use std::fs;
use std::path::Path;

/// Reads and validates `path`. The error is the user-facing rejection reason.
fn read_import(path: &Path) -> std::result::Result<Vec<Location>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    parse_collection(&text).map_err(|e| match e {
        CollectionError::Parse(e) => format!("Import rejected: file is not valid JSON ({})", e),
        CollectionError::Invalid(e) => format!("Import rejected: {}", e),
    })
}

pub fn preview<B: KeyValueStore>(session: &Session<B>, path: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match read_import(path) {
        Ok(locations) => {
            result.add_message(CmdMessage::warning(format!(
                "Importing {} location(s) replaces the current {}",
                locations.len(),
                session.collection.len()
            )));
            result.listed_locations = LocationView::all(&locations).entries;
        }
        Err(reason) => result.add_message(CmdMessage::error(reason)),
    }
    Ok(result)
}

pub fn run<B: KeyValueStore>(session: &mut Session<B>, path: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let locations = match read_import(path) {
        Ok(locations) => locations,
        Err(reason) => {
            tracing::info!(path = %path.display(), %reason, "import rejected");
            result.add_message(CmdMessage::error(reason));
            return Ok(result);
        }
    };

    let count = locations.len();
    session.collection.replace_all(locations)?;
    session.selection.clear();
    result.add_message(CmdMessage::success(format!(
        "Imported {} location(s) from {}",
        count,
        path.display()
    )));
    Ok(result.with_listed_locations(LocationView::all(session.collection.locations()).entries))
}
