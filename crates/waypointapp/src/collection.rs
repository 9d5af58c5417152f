//! # Collection Store
//!
//! [`Collection`] owns the authoritative, ordered list of locations for a session and mirrors
//! it to the [`Persistence`] adapter after every mutation.
//!
//! ## Commit Protocol
//!
//! Each operation builds the *next* list, persists it, and only then replaces the in-memory
//! list:
//!
//! ```text
//! next = f(current) ──▶ save(next) ──ok──▶ current = next
//!                              └──err──▶ current unchanged, error returned
//! ```
//!
//! So the in-memory collection always equals its last successful persistence.
//!
//! ## Editing State
//!
//! At most one location is "open for editing". The collection tracks it by id so that
//! deleting or clearing can drop the reference in the same step; no caller is left holding
//! an id that no longer resolves.
//!
//! ## Reordering Through a View
//!
//! Positions handed to [`Collection::reorder_in_view`] come from a filtered display view
//! (see [`crate::view`]). They are mapped to ids first and the ids back to authoritative
//! positions, never used as raw indexes into the full list.

use crate::error::{Result, WaypointError};
use crate::model::{Location, LocationFields};
use crate::schema::validate;
use crate::store::{KeyValueStore, Persistence};

pub struct Collection<B: KeyValueStore> {
    persistence: Persistence<B>,
    locations: Vec<Location>,
    editing: Option<String>,
}

impl<B: KeyValueStore> Collection<B> {
    /// An empty collection. Nothing is read from or written to the backend.
    pub fn new(persistence: Persistence<B>) -> Self {
        Self::with_locations(persistence, Vec::new())
    }

    /// Adopts an already-validated list without persisting it.
    pub fn with_locations(persistence: Persistence<B>, locations: Vec<Location>) -> Self {
        Self {
            persistence,
            locations,
            editing: None,
        }
    }

    pub fn persistence(&self) -> &Persistence<B> {
        &self.persistence
    }

    pub fn into_persistence(self) -> Persistence<B> {
        self.persistence
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.locations.iter().position(|l| l.id == id)
    }

    fn commit(&mut self, next: Vec<Location>) -> Result<()> {
        self.persistence.save_locations(&next)?;
        self.locations = next;
        Ok(())
    }

    /// Appends to the end. Ids are not re-checked here; new records carry time-ordered ids.
    pub fn insert(&mut self, location: Location) -> Result<()> {
        let mut next = self.locations.clone();
        next.push(location);
        self.commit(next)
    }

    /// Replaces every field except `id` of the matching record.
    ///
    /// Returns `false` (and changes nothing) when no record has `id`.
    pub fn update(&mut self, id: &str, fields: LocationFields) -> Result<bool> {
        let mut next = self.locations.clone();
        let found = match next.iter_mut().find(|l| l.id == id) {
            Some(slot) => {
                *slot = Location::with_id(slot.id.clone(), fields);
                true
            }
            None => false,
        };
        self.commit(next)?;
        Ok(found)
    }

    /// Removes the first record with `id`, clearing editing state if it pointed there.
    pub fn delete(&mut self, id: &str) -> Result<Option<Location>> {
        let mut next = self.locations.clone();
        let pos = next.iter().position(|l| l.id == id);
        let removed = pos.map(|pos| next.remove(pos));
        self.commit(next)?;

        if removed.is_some() && self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(removed)
    }

    /// Moves the element at `old_index` so that it ends up at `new_index`.
    ///
    /// One splice-out/splice-in: `[A,B,C,D]` with `(0, 2)` becomes `[B,C,A,D]`.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        let len = self.locations.len();
        if old_index >= len || new_index >= len {
            return Err(WaypointError::Api(format!(
                "Cannot move position {} to {}: collection has {} location(s)",
                old_index + 1,
                new_index + 1,
                len
            )));
        }

        let mut next = self.locations.clone();
        let moved = next.remove(old_index);
        next.insert(new_index, moved);
        self.commit(next)
    }

    /// Reorders using positions within `view_ids` (the ids of a filtered view, in display
    /// order), translated back to authoritative positions by id.
    pub fn reorder_in_view(
        &mut self,
        view_ids: &[String],
        old_index: usize,
        new_index: usize,
    ) -> Result<()> {
        let lookup = |view_pos: usize| -> Result<usize> {
            let id = view_ids.get(view_pos).ok_or_else(|| {
                WaypointError::Api(format!(
                    "Position {} is not in the current view ({} shown)",
                    view_pos + 1,
                    view_ids.len()
                ))
            })?;
            self.position(id)
                .ok_or_else(|| WaypointError::LocationNotFound(id.clone()))
        };

        let from = lookup(old_index)?;
        let to = lookup(new_index)?;
        self.reorder(from, to)
    }

    /// Wholesale replacement, no merge. Editing state is dropped if its record is gone.
    pub fn replace_all(&mut self, locations: Vec<Location>) -> Result<()> {
        self.commit(locations)?;
        if let Some(id) = self.editing.clone() {
            if self.get(&id).is_none() {
                self.editing = None;
            }
        }
        Ok(())
    }

    /// Validates `raw` first; nothing is applied unless the whole value is valid.
    pub fn replace_all_from_value(&mut self, raw: &serde_json::Value) -> Result<usize> {
        let locations = validate(raw)?;
        let count = locations.len();
        self.replace_all(locations)?;
        Ok(count)
    }

    /// Empties the collection. Confirmation is the caller's concern.
    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())?;
        self.editing = None;
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &str) -> Result<&Location> {
        let pos = self
            .position(id)
            .ok_or_else(|| WaypointError::LocationNotFound(id.to_string()))?;
        self.editing = Some(id.to_string());
        Ok(&self.locations[pos])
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&Location> {
        self.editing.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}
