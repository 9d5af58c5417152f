use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::remote::{self, ArtifactClient, LaunchParams};
use crate::session::Session;
use crate::store::KeyValueStore;
use crate::view::LocationView;

fn require_launch<B: KeyValueStore>(
    session: &Session<B>,
    result: &mut CmdResult,
) -> Option<LaunchParams> {
    let params = session.launch().cloned();
    if params.is_none() {
        result.add_message(CmdMessage::error(
            "Remote artifact unavailable: launch parameters id, token, artifact_id and base_url are all required",
        ));
    }
    params
}

/// Reloads the collection from the artifact. On failure nothing changes.
pub fn load<B: KeyValueStore, C: ArtifactClient + ?Sized>(
    session: &mut Session<B>,
    client: &C,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let Some(params) = require_launch(session, &mut result) else {
        return Ok(result);
    };

    match remote::load(client, &params) {
        Ok(locations) => {
            let count = locations.len();
            session.collection.replace_all(locations)?;
            session.selection.clear();
            result.add_message(CmdMessage::success(format!(
                "Loaded {} location(s) from artifact {}",
                count, params.artifact_id
            )));
            result.listed_locations = LocationView::all(session.collection.locations()).entries;
        }
        Err(e) => {
            tracing::warn!(artifact = %params.artifact_id, error = %e, "remote load failed");
            result.add_message(CmdMessage::error(format!("Remote load failed: {}", e)));
        }
    }
    Ok(result)
}

/// Saves the collection to the artifact.
pub fn save<B: KeyValueStore, C: ArtifactClient + ?Sized>(
    session: &Session<B>,
    client: &C,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let Some(params) = require_launch(session, &mut result) else {
        return Ok(result);
    };

    match remote::save(client, &params, session.collection.locations()) {
        Ok(()) => result.add_message(CmdMessage::success(format!(
            "Saved {} location(s) to artifact {}",
            session.collection.len(),
            params.artifact_id
        ))),
        Err(e) => {
            tracing::warn!(artifact = %params.artifact_id, error = %e, "remote save failed");
            result.add_message(CmdMessage::error(format!("Remote save failed: {}", e)));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, Location, LocationFields};
    use crate::remote::fake::FakeArtifactClient;
    use crate::store::mem_backend::MemBackend;
    use crate::store::Persistence;

    fn loc(title: &str) -> Location {
        Location::new(LocationFields {
            title: title.into(),
            country: "Jordan".into(),
            description: "<p>x</p>".into(),
            image: String::new(),
            video: None,
            audio: None,
            coordinates: Coordinates::new(31.9, 35.9),
            questions: None,
            block_navigation: None,
        })
    }

    fn params() -> LaunchParams {
        LaunchParams::from_query("id=1&token=t&artifact_id=9&base_url=https://studio.example")
            .unwrap()
    }

    #[test]
    fn without_launch_params_nothing_is_sent() {
        let backend = MemBackend::new();
        let session = Session::open_local(Persistence::with_backend(&backend)).unwrap();
        let client = FakeArtifactClient::default();

        let result = save(&session, &client).unwrap();
        assert!(result.has_errors());
        assert!(client.stored.borrow().is_empty());
    }

    #[test]
    fn save_sends_current_collection() {
        let backend = MemBackend::new();
        Persistence::with_backend(&backend)
            .save_locations(&[loc("Petra")])
            .unwrap();
        let session =
            Session::open(Persistence::with_backend(&backend), Some(params()), None).unwrap();
        let client = FakeArtifactClient::default();

        let result = save(&session, &client).unwrap();
        assert!(!result.has_errors());
        assert_eq!(client.stored.borrow().len(), 1);
    }

    #[test]
    fn save_failure_is_a_notice() {
        let backend = MemBackend::new();
        let session =
            Session::open(Persistence::with_backend(&backend), Some(params()), None).unwrap();
        let client = FakeArtifactClient {
            fail_store: true,
            ..Default::default()
        };
        assert!(save(&session, &client).unwrap().has_errors());
    }

    #[test]
    fn failed_reload_keeps_collection() {
        let backend = MemBackend::new();
        let local = vec![loc("Local")];
        Persistence::with_backend(&backend)
            .save_locations(&local)
            .unwrap();
        let mut session =
            Session::open(Persistence::with_backend(&backend), Some(params()), None).unwrap();

        let result = load(&mut session, &FakeArtifactClient::default()).unwrap();
        assert!(result.has_errors());
        assert_eq!(session.collection.locations(), &local[..]);
    }

    #[test]
    fn reload_replaces_collection() {
        let backend = MemBackend::new();
        let mut session =
            Session::open(Persistence::with_backend(&backend), Some(params()), None).unwrap();
        let remote = vec![loc("A"), loc("B")];

        load(&mut session, &FakeArtifactClient::serving_locations(&remote)).unwrap();
        assert_eq!(session.collection.locations(), &remote[..]);
    }
}
