//! Quiz questions are edited through a draft of the whole location, so the same
//! rules apply as in the add/edit form.

use crate::commands::helpers::{check_draft, resolve};
use crate::commands::{CmdMessage, CmdResult};
use crate::draft::{LocationDraft, QuestionDraft};
use crate::error::{Result, WaypointError};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::{DisplayLocation, LocationRef};

/// Appends a question. `block_navigation` is changed only when given.
pub fn add<B: KeyValueStore>(
    session: &mut Session<B>,
    selector: &LocationRef,
    question: QuestionDraft,
    block_navigation: Option<bool>,
) -> Result<CmdResult> {
    let target = resolve(session, selector)?;
    let mut draft = LocationDraft::from_location(&target.location);
    draft.questions.push(question);
    if block_navigation.is_some() {
        draft.block_navigation = block_navigation;
    }

    let count = draft.questions.len();
    save(session, target, draft, format!("Question {} added", count))
}

/// Removes question `number` (1-based).
pub fn remove<B: KeyValueStore>(
    session: &mut Session<B>,
    selector: &LocationRef,
    number: usize,
) -> Result<CmdResult> {
    let target = resolve(session, selector)?;
    let mut draft = LocationDraft::from_location(&target.location);
    if number == 0 || number > draft.questions.len() {
        return Err(WaypointError::Api(format!(
            "Question {} not found ({} question(s) on {})",
            number,
            draft.questions.len(),
            target.location.title
        )));
    }
    draft.questions.remove(number - 1);

    save(session, target, draft, format!("Question {} removed", number))
}

fn save<B: KeyValueStore>(
    session: &mut Session<B>,
    target: DisplayLocation,
    draft: LocationDraft,
    done: String,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !check_draft(&draft, &mut result) {
        result.add_message(CmdMessage::warning("Quiz not saved"));
        return Ok(result);
    }

    let id = target.location.id.clone();
    session.collection.update(&id, draft.into_replacement()?)?;
    if let Some(location) = session.collection.get(&id).cloned() {
        result.add_message(CmdMessage::success(format!("{}: {}", done, location.title)));
        result.affected_locations.push(DisplayLocation {
            index: target.index,
            location,
        });
    }
    Ok(result)
}
