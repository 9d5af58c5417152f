//! # Geocoding
//!
//! Two lookups back the map: reverse geocoding turns a dropped pin into a country name,
//! and place search turns a typed query into candidate pins. Both go through the
//! [`Geocoder`] trait so commands can be tested against a fake.
//!
//! ## Stale Responses
//!
//! Requests are not cancelled. A user can drop a second pin before the first lookup
//! returns, so every lookup carries a [`RequestToken`] from a [`RequestTracker`] and a
//! response is only committed while its token is still current.
//!
//! ## Failure
//!
//! When no country can be resolved (network error or an empty answer) the pending
//! selection is cleared, putting the map back where it was. During an edit the selection
//! falls back to the last pin that had a country, so old coordinates never travel with
//! a new country or the other way round.

use crate::error::{Result, WaypointError};
use crate::model::Coordinates;
use serde::Deserialize;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub name: String,
    pub coordinates: Coordinates,
}

pub trait Geocoder {
    /// Country name for the coordinates, `None` when the provider has no answer.
    fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>>;

    /// Candidates ranked by the provider.
    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>>;
}

/// Client for a Nominatim-compatible HTTP endpoint.
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    base: Url,
    limit: usize,
}

#[derive(Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Deserialize)]
struct ReverseAddress {
    country: Option<String>,
}

#[derive(Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, limit: usize) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| WaypointError::Config(format!("geocoder_url '{}': {}", base_url, e)))?;
        // join() replaces the last segment unless the path ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("waypoint/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WaypointError::Geocode(e.to_string()))?;
        Ok(Self {
            client,
            base,
            limit: limit.max(1),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| WaypointError::Config(format!("geocoder_url: {}", e)))
    }

    fn get(&self, url: Url) -> Result<String> {
        tracing::debug!(%url, "geocoder request");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| WaypointError::Geocode(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WaypointError::Geocode(format!(
                "geocoder answered {}",
                status
            )));
        }
        response
            .text()
            .map_err(|e| WaypointError::Geocode(e.to_string()))
    }
}

impl Geocoder for NominatimGeocoder {
    fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>> {
        let mut url = self.endpoint("reverse")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &coordinates.lat().to_string())
            .append_pair("lon", &coordinates.lng().to_string());
        parse_reverse(&self.get(url)?)
    }

    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        let mut url = self.endpoint("search")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", &self.limit.to_string());
        parse_search(&self.get(url)?)
    }
}

/// Country from a reverse lookup body. Nominatim answers `{"error": ...}` over water.
pub fn parse_reverse(body: &str) -> Result<Option<String>> {
    let response: ReverseResponse = serde_json::from_str(body)
        .map_err(|e| WaypointError::Geocode(format!("unreadable reverse response: {}", e)))?;
    Ok(response
        .address
        .and_then(|a| a.country)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty()))
}

/// Candidates from a search body. Hits with unparsable or non-finite coordinates are skipped.
pub fn parse_search(body: &str) -> Result<Vec<PlaceCandidate>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)
        .map_err(|e| WaypointError::Geocode(format!("unreadable search response: {}", e)))?;
    Ok(hits
        .into_iter()
        .filter_map(|hit| {
            let lat = hit.lat.parse::<f64>().ok()?;
            let lng = hit.lon.parse::<f64>().ok()?;
            let coordinates = Coordinates::new(lat, lng);
            coordinates.is_finite().then(|| PlaceCandidate {
                name: hit.display_name,
                coordinates,
            })
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Issues increasing tokens; only the latest one is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// What happened to a reverse-geocoding response.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Committed(String),
    /// A newer selection superseded this response; nothing changed.
    Stale,
    /// No country could be resolved. `cleared` tells whether the selection was dropped.
    Unresolved { cleared: bool, reason: String },
}

/// The pin currently placed on the map and its resolved country.
#[derive(Debug, Default)]
pub struct MapSelection {
    coordinates: Option<Coordinates>,
    country: Option<String>,
    /// Last pin with a resolved country, put back when an edit's lookup fails.
    confirmed: Option<(Coordinates, String)>,
    tracker: RequestTracker,
}

impl MapSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Places a pin. The previous country no longer applies.
    pub fn select(&mut self, coordinates: Coordinates) -> RequestToken {
        if let (Some(previous), Some(country)) = (self.coordinates, self.country.take()) {
            self.confirmed = Some((previous, country));
        }
        self.coordinates = Some(coordinates);
        self.tracker.issue()
    }

    /// Seeds the selection from an existing record when an edit starts.
    pub fn restore(&mut self, coordinates: Coordinates, country: impl Into<String>) {
        self.coordinates = Some(coordinates);
        self.country = Some(country.into());
        self.confirmed = None;
        self.tracker.issue();
    }

    pub fn clear(&mut self) {
        self.coordinates = None;
        self.country = None;
        self.confirmed = None;
        self.tracker.issue();
    }

    /// Applies a reverse lookup result if `token` is still current.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<Option<String>>,
        editing: bool,
    ) -> Resolution {
        if !self.tracker.is_current(token) {
            tracing::debug!(?token, "discarding stale geocoding response");
            return Resolution::Stale;
        }

        let reason = match result {
            Ok(Some(country)) => {
                self.country = Some(country.clone());
                self.confirmed = None;
                return Resolution::Committed(country);
            }
            Ok(None) => "no country found at this point".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::warn!(%reason, editing, "reverse geocoding failed");
        // An edit falls back to the last pin that had a country, never a mix of old and new
        let (coordinates, country) = match self.confirmed.take().filter(|_| editing) {
            Some((coordinates, country)) => (Some(coordinates), Some(country)),
            None => (None, None),
        };
        self.coordinates = coordinates;
        self.country = country;
        Resolution::Unresolved {
            cleared: self.coordinates.is_none(),
            reason,
        }
    }

    /// Select then resolve in one blocking step.
    pub fn pin<G: Geocoder + ?Sized>(
        &mut self,
        geocoder: &G,
        coordinates: Coordinates,
        editing: bool,
    ) -> Resolution {
        let token = self.select(coordinates);
        let result = geocoder.reverse(coordinates);
        self.resolve(token, result, editing)
    }
}

/// Holds back a search until the input has been quiet for the window.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a keystroke. Restarts the quiet period.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now));
    }

    /// Returns the query to search for once the window has elapsed since the last input.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let ready = match &self.pending {
            Some((_, at)) => now.saturating_duration_since(*at) >= self.window,
            None => false,
        };
        if !ready {
            return None;
        }
        self.pending
            .take()
            .map(|(query, _)| query)
            .filter(|q| !q.trim().is_empty())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned answers keyed by rounded coordinates or query.
    #[derive(Default)]
    pub struct FakeGeocoder {
        pub countries: HashMap<String, String>,
        pub places: HashMap<String, Vec<PlaceCandidate>>,
        pub fail: bool,
        pub calls: RefCell<usize>,
    }

    impl FakeGeocoder {
        pub fn with_country(mut self, coordinates: Coordinates, country: &str) -> Self {
            self.countries
                .insert(coordinates.to_string(), country.to_string());
            self
        }

        pub fn with_places(mut self, query: &str, places: Vec<PlaceCandidate>) -> Self {
            self.places.insert(query.to_lowercase(), places);
            self
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>> {
            *self.calls.borrow_mut() += 1;
            if self.fail {
                return Err(WaypointError::Geocode("connection refused".into()));
            }
            Ok(self.countries.get(&coordinates.to_string()).cloned())
        }

        fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
            *self.calls.borrow_mut() += 1;
            if self.fail {
                return Err(WaypointError::Geocode("connection refused".into()));
            }
            Ok(self
                .places
                .get(&query.to_lowercase())
                .cloned()
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeGeocoder;
    use super::*;

    const PETRA: Coordinates = Coordinates(30.3285, 35.4444);

    #[test]
    fn parse_reverse_reads_country() {
        let body = r#"{"display_name":"Petra","address":{"country":"Jordan","country_code":"jo"}}"#;
        assert_eq!(parse_reverse(body).unwrap(), Some("Jordan".to_string()));
    }

    #[test]
    fn parse_reverse_over_water_is_none() {
        assert_eq!(
            parse_reverse(r#"{"error":"Unable to geocode"}"#).unwrap(),
            None
        );
    }

    #[test]
    fn parse_reverse_rejects_garbage() {
        assert!(parse_reverse("<html>").is_err());
    }

    #[test]
    fn parse_search_keeps_provider_order() {
        let body = r#"[
            {"display_name":"Petra, Jordan","lat":"30.3285","lon":"35.4444"},
            {"display_name":"Broken","lat":"north","lon":"1"},
            {"display_name":"Petra, Greece","lat":"39.2","lon":"26.2"}
        ]"#;
        let hits = parse_search(body).unwrap();
        let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Petra, Jordan", "Petra, Greece"]);
        assert_eq!(hits[0].coordinates, PETRA);
    }

    #[test]
    fn tokens_increase_and_only_latest_is_current() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut selection = MapSelection::new();
        let first = selection.select(Coordinates::new(1.0, 1.0));
        let second = selection.select(PETRA);

        // The first lookup returns late
        let outcome = selection.resolve(first, Ok(Some("Nowhere".into())), false);
        assert_eq!(outcome, Resolution::Stale);
        assert_eq!(selection.country(), None);
        assert_eq!(selection.coordinates(), Some(PETRA));

        let outcome = selection.resolve(second, Ok(Some("Jordan".into())), false);
        assert_eq!(outcome, Resolution::Committed("Jordan".into()));
        assert_eq!(selection.country(), Some("Jordan"));
    }

    #[test]
    fn failure_clears_pending_selection() {
        let mut selection = MapSelection::new();
        let outcome = selection.pin(&FakeGeocoder::failing(), PETRA, false);
        assert!(matches!(outcome, Resolution::Unresolved { cleared: true, .. }));
        assert_eq!(selection.coordinates(), None);
    }

    #[test]
    fn failure_during_edit_keeps_selection() {
        let mut selection = MapSelection::new();
        selection.restore(Coordinates::new(1.0, 1.0), "Egypt");
        let outcome = selection.pin(&FakeGeocoder::failing(), PETRA, true);
        assert!(matches!(
            outcome,
            Resolution::Unresolved { cleared: false, .. }
        ));
        assert_eq!(selection.coordinates(), Some(Coordinates::new(1.0, 1.0)));
        assert_eq!(selection.country(), Some("Egypt"));
    }

    #[test]
    fn failure_during_edit_falls_back_to_last_resolved_pin() {
        let geocoder = FakeGeocoder::default().with_country(PETRA, "Jordan");
        let mut selection = MapSelection::new();
        selection.restore(Coordinates::new(1.0, 1.0), "Egypt");
        selection.pin(&geocoder, PETRA, true);

        // Two quick moves; the second lookup fails
        selection.select(Coordinates::new(2.0, 2.0));
        let token = selection.select(Coordinates::new(3.0, 3.0));
        let outcome = selection.resolve(token, Err(WaypointError::Geocode("offline".into())), true);

        assert!(matches!(outcome, Resolution::Unresolved { cleared: false, .. }));
        assert_eq!(selection.coordinates(), Some(PETRA));
        assert_eq!(selection.country(), Some("Jordan"));
    }

    #[test]
    fn parse_search_skips_non_finite_coordinates() {
        let body = r#"[
            {"display_name":"Nowhere","lat":"NaN","lon":"1"},
            {"display_name":"Far away","lat":"1","lon":"inf"},
            {"display_name":"Petra, Jordan","lat":"30.3285","lon":"35.4444"}
        ]"#;
        let hits = parse_search(body).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Petra, Jordan");
    }

    #[test]
    fn no_country_counts_as_failure() {
        let mut selection = MapSelection::new();
        let outcome = selection.pin(&FakeGeocoder::default(), PETRA, false);
        assert!(matches!(outcome, Resolution::Unresolved { cleared: true, .. }));
    }

    #[test]
    fn pin_commits_country() {
        let geocoder = FakeGeocoder::default().with_country(PETRA, "Jordan");
        let mut selection = MapSelection::new();
        assert_eq!(
            selection.pin(&geocoder, PETRA, false),
            Resolution::Committed("Jordan".into())
        );
        assert_eq!(selection.coordinates(), Some(PETRA));
    }

    #[test]
    fn debouncer_waits_for_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.input("pe", start);
        debouncer.input("petra", start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400)),
            Some("petra".to_string())
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn debouncer_drops_blank_query() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.input("   ", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(20)), None);
    }

    #[test]
    fn nominatim_rejects_bad_base_url() {
        assert!(matches!(
            NominatimGeocoder::new("not a url", 5),
            Err(WaypointError::Config(_))
        ));
    }
}
