//! # Storage Layer
//!
//! Persistence is a plain key/value store: one string value per well-known key. The
//! [`KeyValueStore`] trait handles the "how" (filesystem vs memory), while [`Persistence`]
//! handles the "what" (which keys exist, how the collection is encoded, and how corrupt data
//! is healed).
//!
//! ## Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `locations` | The collection as a compact JSON array |
//! | `language` | Two-letter UI language code |
//! | `tour_seen` | `"true"` once the guided tour has been dismissed |
//!
//! ## Startup Load
//!
//! The stored collection may be absent, or it may be corrupt (hand-edited, truncated,
//! written by an older build). Neither case is fatal:
//!
//! ```text
//! NoData ──(key absent)──────────────────────▶ Empty
//! NoData ──(parse fails)─────────────────────▶ Cleared  (key removed, warning logged)
//! NoData ──(parse ok, validation fails)──────▶ Cleared  (key removed, warning logged)
//! NoData ──(parse ok, validation ok)─────────▶ Loaded
//! ```
//!
//! Removing the bad value means the same corruption cannot greet the user on the next
//! start.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per key in the data directory, atomic writes.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.

use crate::error::{Result, WaypointError};
use crate::model::{to_json, Location};
use crate::schema::{parse_collection, CollectionError};

pub mod fs_backend;
pub mod mem_backend;

pub const KEY_LOCATIONS: &str = "locations";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_TOUR_SEEN: &str = "tour_seen";

pub const DEFAULT_LANGUAGE: &str = "en";

/// Abstract interface for raw key/value I/O.
pub trait KeyValueStore {
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Returns Ok(None) if nothing is stored under `key`.
    /// Returns `WaypointError::Corrupt` when the stored bytes are not text, and other
    /// errors only on actual I/O failures.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Outcome of reading the stored collection at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum StartupLoad {
    /// Nothing was stored.
    Empty,
    /// A stored value was present but unusable and has been removed.
    Cleared { reason: String },
    /// The stored collection passed validation.
    Loaded(Vec<Location>),
}

impl StartupLoad {
    pub fn into_locations(self) -> Vec<Location> {
        match self {
            StartupLoad::Loaded(locations) => locations,
            StartupLoad::Empty | StartupLoad::Cleared { .. } => Vec::new(),
        }
    }
}

/// Typed access to the well-known keys.
pub struct Persistence<B: KeyValueStore> {
    pub(crate) backend: B,
}

impl<B: KeyValueStore> Persistence<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Refuses non-finite coordinates, which JSON would store as `null` and the next
    /// start would then discard as invalid.
    pub fn save_locations(&self, locations: &[Location]) -> Result<()> {
        if let Some(bad) = locations.iter().find(|l| !l.coordinates.is_finite()) {
            return Err(WaypointError::Store(format!(
                "'{}' has non-finite coordinates",
                bad.title
            )));
        }
        let json = to_json(locations)?;
        self.backend.save(KEY_LOCATIONS, &json)
    }

    /// The raw persisted collection, as stored.
    pub fn raw_locations(&self) -> Result<Option<String>> {
        self.backend.load(KEY_LOCATIONS)
    }

    /// Runs the startup state machine. Only backend I/O errors propagate; corrupt content
    /// is removed and reported as [`StartupLoad::Cleared`].
    pub fn load_locations(&self) -> Result<StartupLoad> {
        let raw = match self.backend.load(KEY_LOCATIONS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(StartupLoad::Empty),
            Err(WaypointError::Corrupt(e)) => {
                return self.discard_locations(format!("stored locations are not text: {}", e))
            }
            Err(e) => return Err(e),
        };

        match parse_collection(&raw) {
            Ok(locations) => {
                tracing::debug!(count = locations.len(), "loaded stored locations");
                Ok(StartupLoad::Loaded(locations))
            }
            Err(CollectionError::Parse(e)) => {
                self.discard_locations(format!("stored locations are not JSON: {}", e))
            }
            Err(CollectionError::Invalid(e)) => {
                self.discard_locations(format!("stored locations are invalid: {}", e))
            }
        }
    }

    fn discard_locations(&self, reason: String) -> Result<StartupLoad> {
        tracing::warn!(%reason, "discarding stored locations");
        self.backend.remove(KEY_LOCATIONS)?;
        Ok(StartupLoad::Cleared { reason })
    }

    /// Loads a preference, treating an undecodable value as unset.
    fn load_preference(&self, key: &str) -> Result<Option<String>> {
        match self.backend.load(key) {
            Err(WaypointError::Corrupt(reason)) => {
                tracing::warn!(key, %reason, "ignoring stored preference");
                Ok(None)
            }
            other => other,
        }
    }

    /// The stored language, if one was chosen and is well formed.
    pub fn stored_language(&self) -> Result<Option<String>> {
        Ok(self
            .load_preference(KEY_LANGUAGE)?
            .and_then(|code| normalize_language(&code)))
    }

    /// The stored language, falling back to [`DEFAULT_LANGUAGE`] when absent or malformed.
    pub fn language(&self) -> Result<String> {
        Ok(self
            .stored_language()?
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()))
    }

    /// Returns the normalized code that was stored.
    pub fn set_language(&self, code: &str) -> Result<String> {
        let normalized = normalize_language(code).ok_or_else(|| {
            WaypointError::Api(format!(
                "Invalid language code '{}': expected two letters, e.g. 'en'",
                code
            ))
        })?;
        self.backend.save(KEY_LANGUAGE, &normalized)?;
        Ok(normalized)
    }

    pub fn tour_seen(&self) -> Result<bool> {
        Ok(matches!(
            self.load_preference(KEY_TOUR_SEEN)?.as_deref().map(str::trim),
            Some("true") | Some("1")
        ))
    }

    pub fn set_tour_seen(&self, seen: bool) -> Result<()> {
        if seen {
            self.backend.save(KEY_TOUR_SEEN, "true")
        } else {
            self.backend.remove(KEY_TOUR_SEEN)
        }
    }
}

/// Two ASCII letters, lowercased.
pub fn normalize_language(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_lowercase())
    } else {
        None
    }
}
