//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all waypoint operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (parses `3` or an id into a [`LocationRef`], applies config defaults)
//! - **Owns the collaborators**: the session, the geocoder, the artifact client
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal I/O**: No stdout, stderr, or formatting
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Generic Over KeyValueStore
//!
//! `WaypointApi<B: KeyValueStore>` is generic over the storage backend:
//! - Production: `WaypointApi<FsBackend>`
//! - Testing: `WaypointApi<MemBackend>`
//!
//! The geocoder and artifact client are trait objects, so tests swap in fakes without
//! touching the network.

use crate::commands::{self, helpers::Pin, update::LocationEdit, CmdResult};
use crate::config::WaypointConfig;
use crate::draft::{LocationDraft, QuestionDraft};
use crate::error::Result;
use crate::geocode::{Debouncer, Geocoder};
use crate::remote::ArtifactClient;
use crate::session::{Session, StartupOutcome};
use crate::store::{KeyValueStore, Persistence};
use crate::view::LocationRef;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// The main API facade for waypoint operations.
pub struct WaypointApi<B: KeyValueStore> {
    session: Session<B>,
    config: WaypointConfig,
    geocoder: Box<dyn Geocoder>,
    artifacts: Box<dyn ArtifactClient>,
    search: Debouncer,
}

impl<B: KeyValueStore> WaypointApi<B> {
    /// Opens the session, loading the remote artifact first when `launch` is complete.
    pub fn open(
        persistence: Persistence<B>,
        config: WaypointConfig,
        launch: Option<crate::remote::LaunchParams>,
        geocoder: Box<dyn Geocoder>,
        artifacts: Box<dyn ArtifactClient>,
    ) -> Result<Self> {
        let session = Session::open(persistence, launch, Some(artifacts.as_ref()))?;
        let search = Debouncer::new(config.search_debounce());
        Ok(Self {
            session,
            config,
            geocoder,
            artifacts,
            search,
        })
    }

    pub fn startup(&self) -> &StartupOutcome {
        self.session.startup()
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn config(&self) -> &WaypointConfig {
        &self.config
    }

    pub fn list(&self, query: Option<&str>) -> Result<CmdResult> {
        commands::list::run(&self.session, query)
    }

    pub fn show(&self, selector: &str) -> Result<CmdResult> {
        commands::list::show(&self.session, &selector.parse::<LocationRef>()?)
    }

    pub fn add(&mut self, draft: LocationDraft, pin: Option<Pin>) -> Result<CmdResult> {
        commands::create::run(&mut self.session, self.geocoder.as_ref(), draft, pin)
    }

    pub fn edit(&mut self, selector: &str, edit: LocationEdit) -> Result<CmdResult> {
        let selector = selector.parse::<LocationRef>()?;
        commands::update::run(&mut self.session, self.geocoder.as_ref(), &selector, edit)
    }

    pub fn delete(&mut self, selector: &str) -> Result<CmdResult> {
        commands::delete::run(&mut self.session, &selector.parse::<LocationRef>()?)
    }

    pub fn move_location(&mut self, from: usize, to: usize, filter: Option<&str>) -> Result<CmdResult> {
        commands::move_locations::run(&mut self.session, from, to, filter)
    }

    pub fn add_question(
        &mut self,
        selector: &str,
        question: QuestionDraft,
        block_navigation: Option<bool>,
    ) -> Result<CmdResult> {
        let selector = selector.parse::<LocationRef>()?;
        commands::quiz::add(&mut self.session, &selector, question, block_navigation)
    }

    pub fn remove_question(&mut self, selector: &str, number: usize) -> Result<CmdResult> {
        let selector = selector.parse::<LocationRef>()?;
        commands::quiz::remove(&mut self.session, &selector, number)
    }

    pub fn import_preview(&self, path: &Path) -> Result<CmdResult> {
        commands::import::preview(&self.session, path)
    }

    pub fn import(&mut self, path: &Path) -> Result<CmdResult> {
        commands::import::run(&mut self.session, path)
    }

    /// Exports to `path`, or to the configured `export_file`.
    pub fn export(&self, path: Option<&Path>) -> Result<CmdResult> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.config.export_file));
        commands::export::run(&self.session, &path)
    }

    pub fn clear_preview(&self) -> Result<CmdResult> {
        commands::clear::preview(&self.session)
    }

    pub fn clear(&mut self) -> Result<CmdResult> {
        commands::clear::run(&mut self.session)
    }

    pub fn search_places(&self, query: &str) -> Result<CmdResult> {
        commands::place::search(self.geocoder.as_ref(), query)
    }

    /// Records typed search input; see [`WaypointApi::poll_search`].
    pub fn type_search(&mut self, query: &str, now: Instant) {
        self.search.input(query, now);
    }

    /// Runs the pending search once the input has been quiet for `search_debounce_ms`.
    pub fn poll_search(&mut self, now: Instant) -> Option<Result<CmdResult>> {
        let query = self.search.poll(now)?;
        Some(self.search_places(&query))
    }

    pub fn search_debounce(&self) -> std::time::Duration {
        self.search.window()
    }

    /// True while typed input is waiting out the debounce window.
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn remote_load(&mut self) -> Result<CmdResult> {
        commands::remote::load(&mut self.session, self.artifacts.as_ref())
    }

    pub fn remote_save(&self) -> Result<CmdResult> {
        commands::remote::save(&self.session, self.artifacts.as_ref())
    }

    pub fn language(&self, code: Option<&str>) -> Result<CmdResult> {
        commands::prefs::language(&self.session, code, &self.config.default_language())
    }

    pub fn tour(&self, reset: bool) -> Result<CmdResult> {
        commands::prefs::tour(&self.session, reset)
    }

    pub fn tour_seen(&self) -> Result<bool> {
        self.session.persistence().tour_seen()
    }

    pub fn show_config(&self) -> Result<CmdResult> {
        Ok(CmdResult {
            config: Some(self.config.clone()),
            ..Default::default()
        })
    }
}
