//! # Display View
//!
//! Users refer to locations by their position in what they are looking at, not by id.
//! A [`LocationView`] is the ordered list a client shows: either the whole collection or
//! the subset matching a search query. Each entry carries its 1-based display index.
//!
//! Display indexes are only meaningful within the view that produced them. Anything that
//! mutates by position goes through the ids of the view (see
//! [`crate::collection::Collection::reorder_in_view`]).
//!
//! ## Selectors
//!
//! [`LocationRef`] accepts either form:
//! - `3`: the third entry of the view
//! - `0190c3f2-7a1e-7cc3-…`: an exact id

use crate::error::{Result, WaypointError};
use crate::model::Location;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLocation {
    /// 1-based position in the view.
    pub index: usize,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct LocationView {
    pub entries: Vec<DisplayLocation>,
    pub query: Option<String>,
}

impl LocationView {
    pub fn all(locations: &[Location]) -> Self {
        Self::filtered(locations, None)
    }

    /// Case-insensitive match on title or country. A blank query shows everything.
    pub fn filtered(locations: &[Location], query: Option<&str>) -> Self {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let needle = query.map(str::to_lowercase);

        let entries = locations
            .iter()
            .filter(|l| match &needle {
                Some(n) => {
                    l.title.to_lowercase().contains(n) || l.country.to_lowercase().contains(n)
                }
                None => true,
            })
            .enumerate()
            .map(|(i, l)| DisplayLocation {
                index: i + 1,
                location: l.clone(),
            })
            .collect();

        Self {
            entries,
            query: query.map(str::to_string),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.location.id.clone()).collect()
    }

    pub fn resolve(&self, selector: &LocationRef) -> Result<&DisplayLocation> {
        match selector {
            LocationRef::Index(n) => n
                .checked_sub(1)
                .and_then(|i| self.entries.get(i))
                .ok_or_else(|| {
                    WaypointError::Api(format!(
                        "Index {} not found ({} location(s) shown)",
                        n,
                        self.entries.len()
                    ))
                }),
            LocationRef::Id(id) => self
                .entries
                .iter()
                .find(|e| &e.location.id == id)
                .ok_or_else(|| WaypointError::LocationNotFound(id.clone())),
        }
    }
}

/// A user input selecting one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationRef {
    Index(usize),
    Id(String),
}

impl FromStr for LocationRef {
    type Err = WaypointError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(WaypointError::Api("Empty location reference".to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            let n: usize = s
                .parse()
                .map_err(|_| WaypointError::Api(format!("Invalid index: {}", s)))?;
            if n == 0 {
                return Err(WaypointError::Api("Indexes start at 1".to_string()));
            }
            return Ok(LocationRef::Index(n));
        }
        Ok(LocationRef::Id(s.to_string()))
    }
}

impl std::fmt::Display for LocationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationRef::Index(n) => write!(f, "{}", n),
            LocationRef::Id(id) => write!(f, "{}", id),
        }
    }
}
