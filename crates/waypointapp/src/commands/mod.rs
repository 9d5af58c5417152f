//! # Command Layer
//!
//! This module contains the **core business logic** of waypoint. Each command lives in its
//! own submodule and implements plain Rust functions over a [`Session`](crate::session::Session).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Turn user input into collection operations
//! - Drive the map selection and geocoder when a pin is involved
//! - Return structured `CmdResult` with affected locations and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Terminal output**: No stdout, stderr, or formatting
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//! - **User interaction**: No prompts. Import and clear are split so the UI can confirm.
//!
//! ## Errors vs Notices
//!
//! `Err` is reserved for failures the command cannot turn into a stable state report,
//! such as a location that does not exist or a store that cannot be written. Refusals the
//! user can act on (a blank description, an import file that fails validation, an
//! unreachable geocoder) come back as `Ok` with an error-level [`CmdMessage`], and nothing
//! is mutated.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests run against
//! [`MemBackend`](crate::store::mem_backend::MemBackend) and the fake geocoder and
//! artifact client, never the network or filesystem.
//!
//! ## Command Modules
//!
//! - [`create`]: Add a location from a draft
//! - [`update`]: Edit an existing location
//! - [`delete`]: Remove a location
//! - [`move_locations`]: Reorder, optionally within a filtered view
//! - [`list`]: List or show locations
//! - [`quiz`]: Add or remove quiz questions
//! - [`import`]: Replace the collection from a file
//! - [`export`]: Write the collection to a file
//! - [`clear`]: Empty the collection
//! - [`place`]: Search for places by name
//! - [`remote`]: Load from or save to the remote artifact
//! - [`prefs`]: Language and guided tour
//! - [`helpers`]: Shared utilities (selector resolution, pin placement)

use crate::config::WaypointConfig;
use crate::geocode::PlaceCandidate;
use crate::view::DisplayLocation;
use serde::Serialize;

pub mod clear;
pub mod create;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod move_locations;
pub mod place;
pub mod prefs;
pub mod quiz;
pub mod remote;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_locations: Vec<DisplayLocation>,
    pub listed_locations: Vec<DisplayLocation>,
    pub places: Vec<PlaceCandidate>,
    pub messages: Vec<CmdMessage>,
    pub config: Option<WaypointConfig>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_locations(mut self, locations: Vec<DisplayLocation>) -> Self {
        self.affected_locations = locations;
        self
    }

    pub fn with_listed_locations(mut self, locations: Vec<DisplayLocation>) -> Self {
        self.listed_locations = locations;
        self
    }

    /// True when the command refused or failed part of its work.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }
}
