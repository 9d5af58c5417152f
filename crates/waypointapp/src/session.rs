//! # Session
//!
//! A [`Session`] is the root state object: the collection, the map selection, and the
//! launch parameters for this run. Every command operates on one.
//!
//! ## Startup
//!
//! [`Session::open`] decides where the collection comes from:
//!
//! ```text
//! launch params? ──yes──▶ fetch artifact ──ok──▶ replace_all ──ok──▶ Remote
//!       │                      │                      │
//!       no                    err                    err
//!       ▼                      ▼                      ▼
//!   local startup load ◀───────┴──────────────────────┘
//! ```
//!
//! A failed remote load never stops startup. The reason is logged and kept on the
//! [`StartupOutcome`] so a client can show it.

use crate::collection::Collection;
use crate::error::Result;
use crate::geocode::MapSelection;
use crate::remote::{self, ArtifactClient, LaunchParams};
use crate::store::{KeyValueStore, Persistence, StartupLoad};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupSource {
    Remote,
    Stored,
    Empty,
    /// Stored data was unusable and has been removed.
    Cleared { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupOutcome {
    pub source: StartupSource,
    pub count: usize,
    /// Why a remote load was attempted and abandoned.
    pub remote_error: Option<String>,
}

pub struct Session<B: KeyValueStore> {
    pub collection: Collection<B>,
    pub selection: MapSelection,
    launch: Option<LaunchParams>,
    startup: StartupOutcome,
}

impl<B: KeyValueStore> Session<B> {
    /// Runs the startup path. Only local backend I/O errors are returned.
    pub fn open(
        persistence: Persistence<B>,
        launch: Option<LaunchParams>,
        client: Option<&dyn ArtifactClient>,
    ) -> Result<Self> {
        let mut collection = Collection::new(persistence);

        let mut remote_error = None;
        if let (Some(params), Some(client)) = (launch.clone(), client) {
            let loaded = remote::load(client, &params)
                .and_then(|locations| collection.replace_all(locations));
            match loaded {
                Ok(()) => {
                    tracing::info!(
                        artifact = %params.artifact_id,
                        count = collection.len(),
                        "loaded remote artifact"
                    );
                    let count = collection.len();
                    return Ok(Self {
                        collection,
                        selection: MapSelection::new(),
                        launch,
                        startup: StartupOutcome {
                            source: StartupSource::Remote,
                            count,
                            remote_error: None,
                        },
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        artifact = %params.artifact_id,
                        error = %e,
                        "remote load failed, using local data"
                    );
                    remote_error = Some(e.to_string());
                }
            }
        }

        let load = collection.persistence().load_locations()?;
        let source = match &load {
            StartupLoad::Empty => StartupSource::Empty,
            StartupLoad::Cleared { reason } => StartupSource::Cleared {
                reason: reason.clone(),
            },
            StartupLoad::Loaded(_) => StartupSource::Stored,
        };
        let collection =
            Collection::with_locations(collection.into_persistence(), load.into_locations());
        let count = collection.len();

        Ok(Self {
            collection,
            selection: MapSelection::new(),
            launch,
            startup: StartupOutcome {
                source,
                count,
                remote_error,
            },
        })
    }

    /// A session over local data only.
    pub fn open_local(persistence: Persistence<B>) -> Result<Self> {
        Self::open(persistence, None, None)
    }

    pub fn startup(&self) -> &StartupOutcome {
        &self.startup
    }

    pub fn launch(&self) -> Option<&LaunchParams> {
        self.launch.as_ref()
    }

    pub fn persistence(&self) -> &Persistence<B> {
        self.collection.persistence()
    }
}
