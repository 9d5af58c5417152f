//! User preferences kept in the store: UI language and whether the guided tour
//! has been seen.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::Session;
use crate::store::KeyValueStore;

/// The guided tour, one step per stop.
pub const TOUR_STEPS: &[&str] = &[
    "Search for a place with `waypoint place <name>`.",
    "Add a location with `waypoint add --title <title> --at <lat>,<lng>` or `--place <name>`.",
    "Every location needs a description. Pass HTML with `--description`, or Markdown with `--markdown`.",
    "Attach a quiz with `waypoint quiz add <location> --text <question> --type <type> --answer <answer>`.",
    "Reorder with `waypoint move <from> <to>`. Add `--filter` to use positions from a search.",
    "Share the collection with `waypoint export`, or replace it with `waypoint import <file>`.",
];

/// Shows the current language, or sets it when `code` is given.
pub fn language<B: KeyValueStore>(
    session: &Session<B>,
    code: Option<&str>,
    default: &str,
) -> Result<CmdResult> {
    let persistence = session.persistence();
    let mut result = CmdResult::default();
    match code {
        Some(code) => {
            let stored = persistence.set_language(code)?;
            result.add_message(CmdMessage::success(format!("Language set to {}", stored)));
        }
        None => {
            let current = persistence
                .stored_language()?
                .unwrap_or_else(|| default.to_string());
            result.add_message(CmdMessage::info(format!("Language: {}", current)));
        }
    }
    Ok(result)
}

/// Walks through the tour and marks it seen. `reset` only clears the flag.
pub fn tour<B: KeyValueStore>(session: &Session<B>, reset: bool) -> Result<CmdResult> {
    let persistence = session.persistence();
    let mut result = CmdResult::default();
    if reset {
        persistence.set_tour_seen(false)?;
        result.add_message(CmdMessage::success(
            "Tour reset; it will be offered again",
        ));
        return Ok(result);
    }

    for (i, step) in TOUR_STEPS.iter().enumerate() {
        result.add_message(CmdMessage::info(format!(
            "{}/{}  {}",
            i + 1,
            TOUR_STEPS.len(),
            step
        )));
    }
    persistence.set_tour_seen(true)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

    #[test]
    fn language_uses_configured_default_until_set() {
        let backend = MemBackend::new();
        let session = Session::open_local(Persistence::with_backend(&backend)).unwrap();

        let result = language(&session, None, "fr").unwrap();
        assert_eq!(result.messages[0].content, "Language: fr");

        language(&session, Some("AR"), "fr").unwrap();
        let result = language(&session, None, "fr").unwrap();
        assert_eq!(result.messages[0].content, "Language: ar");
    }

    #[test]
    fn invalid_language_is_an_error() {
        let backend = MemBackend::new();
        let session = Session::open_local(Persistence::with_backend(&backend)).unwrap();
        assert!(language(&session, Some("arabic"), "en").is_err());
    }

    #[test]
    fn tour_marks_seen_and_reset_clears() {
        let backend = MemBackend::new();
        let session = Session::open_local(Persistence::with_backend(&backend)).unwrap();

        let result = tour(&session, false).unwrap();
        assert_eq!(result.messages.len(), TOUR_STEPS.len());
        assert!(session.persistence().tour_seen().unwrap());

        tour(&session, true).unwrap();
        assert!(!session.persistence().tour_seen().unwrap());
    }
}
