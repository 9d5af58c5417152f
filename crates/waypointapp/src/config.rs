//! # Configuration
//!
//! Waypoint configuration is managed by [`confique`], which handles layered loading
//! from a TOML file and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `WAYPOINT_GEOCODER_URL`, `WAYPOINT_SEARCH_LIMIT`, etc.
//! 2. **Config file**: `waypoint.toml` in the data directory.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `geocoder_url` | `https://nominatim.openstreetmap.org` | Nominatim-compatible endpoint |
//! | `search_limit` | `5` | Candidates requested per place search |
//! | `search_debounce_ms` | `300` | Quiet window before a typed search fires |
//! | `export_file` | `locations.json` | Default target of `waypoint export` |
//! | `default_language` | `en` | UI language until one is chosen |
//!
//! ## CLI Usage
//!
//! - `waypoint config`: show the resolved values.
//! - `waypoint config --template`: print a commented sample `waypoint.toml`.

use crate::error::{Result, WaypointError};
use crate::geocode::DEFAULT_GEOCODER_URL;
use crate::store::{normalize_language, DEFAULT_LANGUAGE};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "waypoint.toml";
pub const DEFAULT_EXPORT_FILE: &str = "locations.json";

/// Configuration for waypoint, stored in `waypoint.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WaypointConfig {
    /// Base URL of a Nominatim-compatible geocoding service.
    #[config(env = "WAYPOINT_GEOCODER_URL", default = "https://nominatim.openstreetmap.org")]
    pub geocoder_url: String,

    /// Number of place candidates requested per search.
    #[config(env = "WAYPOINT_SEARCH_LIMIT", default = 5)]
    pub search_limit: usize,

    /// Milliseconds of quiet input before a search is sent.
    #[config(env = "WAYPOINT_SEARCH_DEBOUNCE_MS", default = 300)]
    pub search_debounce_ms: u64,

    /// File written by `waypoint export` when no path is given.
    #[config(env = "WAYPOINT_EXPORT_FILE", default = "locations.json")]
    pub export_file: String,

    /// Two-letter language used until the user picks one.
    #[config(env = "WAYPOINT_DEFAULT_LANGUAGE", default = "en")]
    pub default_language: String,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            search_limit: 5,
            search_debounce_ms: 300,
            export_file: DEFAULT_EXPORT_FILE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl WaypointConfig {
    /// Loads `waypoint.toml` from `dir` (if present) under the environment.
    pub fn load(dir: &Path) -> Result<Self> {
        WaypointConfig::builder()
            .env()
            .file(dir.join(CONFIG_FILE))
            .load()
            .map_err(|e| WaypointError::Config(e.to_string()))
    }

    /// A commented sample file with every setting at its default.
    pub fn template() -> String {
        confique::toml::template::<WaypointConfig>(confique::toml::FormatOptions::default())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// The configured default language, normalized. Falls back to `en` when malformed.
    pub fn default_language(&self) -> String {
        normalize_language(&self.default_language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// `(key, value)` pairs in declaration order, for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("geocoder_url", self.geocoder_url.clone()),
            ("search_limit", self.search_limit.to_string()),
            ("search_debounce_ms", self.search_debounce_ms.to_string()),
            ("export_file", self.export_file.clone()),
            ("default_language", self.default_language.clone()),
        ]
    }
}
