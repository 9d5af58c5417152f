//! # Remote Artifacts
//!
//! A collection can live in a remote "studio" as an artifact. When waypoint is launched
//! with all four launch parameters, startup loads the artifact instead of local data and
//! `remote save` writes it back.
//!
//! ## Launch Parameters
//!
//! A query string such as `id=7&token=abc&artifact_id=42&base_url=https://studio.example`.
//! All four keys are required together; any missing or blank key means remote
//! collaboration is unavailable. They are never persisted.
//!
//! ## Wire Format
//!
//! | Operation | Request | Body |
//! |-----------|---------|------|
//! | load | `GET <base>/studio/artifacts/info/<artifact_id>/` | response `{"content": "<collection JSON>"}` |
//! | save | `PUT <base>/studio/artifacts/update/<artifact_id>/` | request `{"content": "<collection JSON>"}` |
//!
//! Both carry `Authorization: Bearer <token>`. The collection travels as a JSON string
//! inside JSON, so it is decoded twice on load.

use crate::error::{Result, WaypointError};
use crate::model::{to_json, Location};
use crate::schema;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::{form_urlencoded, Url};

pub const CONTENT_FIELD: &str = "content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParams {
    pub identifier: String,
    pub token: String,
    pub artifact_id: String,
    pub base_url: String,
}

impl LaunchParams {
    /// Parses a query string, with or without a leading `?` or URL prefix.
    /// Returns `None` unless all four parameters are present and non-blank.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.split_once('?').map_or(query, |(_, q)| q);

        let mut identifier = None;
        let mut token = None;
        let mut artifact_id = None;
        let mut base_url = None;
        for (key, value) in form_urlencoded::parse(query.trim().as_bytes()) {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "id" => identifier = Some(value),
                "token" => token = Some(value),
                "artifact_id" => artifact_id = Some(value),
                "base_url" => base_url = Some(value),
                _ => {}
            }
        }

        Some(Self {
            identifier: identifier?,
            token: token?,
            artifact_id: artifact_id?,
            base_url: base_url?,
        })
    }

    pub fn info_url(&self) -> Result<Url> {
        self.artifact_url("info")
    }

    pub fn update_url(&self) -> Result<Url> {
        self.artifact_url("update")
    }

    fn artifact_url(&self, action: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| WaypointError::Remote(format!("base_url '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| WaypointError::Remote(format!("base_url '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(["studio", "artifacts", action, self.artifact_id.as_str(), ""]);
        Ok(url)
    }
}

/// Transport for artifact bodies. Implementations do no decoding.
pub trait ArtifactClient {
    /// The raw response body of the info endpoint.
    fn fetch(&self, params: &LaunchParams) -> Result<String>;

    /// Sends `body` to the update endpoint. A non-success status is an error.
    fn store(&self, params: &LaunchParams, body: &str) -> Result<()>;
}

pub struct HttpArtifactClient {
    client: reqwest::blocking::Client,
}

impl HttpArtifactClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WaypointError::Remote(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ArtifactClient for HttpArtifactClient {
    fn fetch(&self, params: &LaunchParams) -> Result<String> {
        let url = params.info_url()?;
        tracing::debug!(%url, "fetching artifact");
        let response = self
            .client
            .get(url)
            .bearer_auth(&params.token)
            .send()
            .map_err(|e| WaypointError::Remote(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WaypointError::Remote(format!("artifact load answered {}", status)));
        }
        response
            .text()
            .map_err(|e| WaypointError::Remote(e.to_string()))
    }

    fn store(&self, params: &LaunchParams, body: &str) -> Result<()> {
        let url = params.update_url()?;
        tracing::debug!(%url, "saving artifact");
        let response = self
            .client
            .put(url)
            .bearer_auth(&params.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| WaypointError::Remote(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WaypointError::Remote(format!("artifact save answered {}", status)));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ArtifactInfo {
    content: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ArtifactUpdate<'a> {
    content: &'a str,
}

/// Decodes an info body down to the validated collection.
pub fn decode_artifact(body: &str) -> Result<Vec<Location>> {
    let info: ArtifactInfo = serde_json::from_str(body)
        .map_err(|e| WaypointError::Remote(format!("artifact body is not JSON: {}", e)))?;
    let payload = match info.content {
        Some(serde_json::Value::String(s)) => s,
        Some(_) => {
            return Err(WaypointError::Remote(format!(
                "artifact field '{}' is not a string",
                CONTENT_FIELD
            )))
        }
        None => {
            return Err(WaypointError::Remote(format!(
                "artifact has no '{}' field",
                CONTENT_FIELD
            )))
        }
    };
    Ok(schema::parse_collection(&payload)?)
}

/// The update request body for `locations`.
pub fn encode_artifact(locations: &[Location]) -> Result<String> {
    let content = to_json(locations)?;
    Ok(serde_json::to_string(&ArtifactUpdate { content: &content })?)
}

/// Fetches and decodes the artifact. Any failure is returned for the caller to fall back on.
pub fn load<C: ArtifactClient + ?Sized>(client: &C, params: &LaunchParams) -> Result<Vec<Location>> {
    decode_artifact(&client.fetch(params)?)
}

pub fn save<C: ArtifactClient + ?Sized>(
    client: &C,
    params: &LaunchParams,
    locations: &[Location],
) -> Result<()> {
    client.store(params, &encode_artifact(locations)?)
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fake {
    use super::*;
    use std::cell::RefCell;

    /// Serves a canned body and records stored bodies.
    #[derive(Default)]
    pub struct FakeArtifactClient {
        pub body: Option<String>,
        pub fail_store: bool,
        pub stored: RefCell<Vec<String>>,
    }

    impl FakeArtifactClient {
        pub fn serving(body: impl Into<String>) -> Self {
            Self {
                body: Some(body.into()),
                ..Default::default()
            }
        }

        pub fn serving_locations(locations: &[Location]) -> Self {
            let content = to_json(locations).unwrap();
            Self::serving(serde_json::json!({ "content": content }).to_string())
        }
    }

    impl ArtifactClient for FakeArtifactClient {
        fn fetch(&self, _params: &LaunchParams) -> Result<String> {
            self.body
                .clone()
                .ok_or_else(|| WaypointError::Remote("connection refused".into()))
        }

        fn store(&self, _params: &LaunchParams, body: &str) -> Result<()> {
            if self.fail_store {
                return Err(WaypointError::Remote("artifact save answered 500".into()));
            }
            self.stored.borrow_mut().push(body.to_string());
            Ok(())
        }
    }
}
