//! # Initialization
//!
//! Wires the production collaborators together: the data directory, the configuration
//! found there, the filesystem store, the Nominatim geocoder and the HTTP artifact client.
//!
//! ## Data Directory
//!
//! 1. `data_override` (the CLI passes `--data` or `WAYPOINT_DATA`) is used as-is.
//! 2. Otherwise the OS-appropriate data directory (via the `directories` crate), e.g.
//!    `~/.local/share/waypoint` on Linux.
//!
//! The directory holds one file per store key plus the optional `waypoint.toml`.
//!
//! ## Launch Parameters
//!
//! A launch query string is parsed here. If it is present but incomplete a warning is
//! logged and the session starts local-only, as if none was given.

use crate::api::WaypointApi;
use crate::config::WaypointConfig;
use crate::error::{Result, WaypointError};
use crate::geocode::NominatimGeocoder;
use crate::remote::{HttpArtifactClient, LaunchParams};
use crate::store::fs_backend::FsBackend;
use crate::store::Persistence;
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct WaypointContext {
    pub api: WaypointApi<FsBackend>,
    pub data_dir: PathBuf,
}

/// The directory all waypoint data lives in.
pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    match data_override {
        Some(path) => Ok(path),
        None => ProjectDirs::from("com", "waypoint", "waypoint")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                WaypointError::Config(
                    "Could not determine a data directory; pass --data or set WAYPOINT_DATA"
                        .to_string(),
                )
            }),
    }
}

/// Parses `launch`, logging when it is present but incomplete.
pub fn parse_launch(launch: Option<&str>) -> Option<LaunchParams> {
    let raw = launch.map(str::trim).filter(|s| !s.is_empty())?;
    let params = LaunchParams::from_query(raw);
    if params.is_none() {
        tracing::warn!("launch parameters incomplete; remote artifact disabled");
    }
    params
}

/// Builds the production API.
///
/// # Arguments
///
/// * `data_override` - Explicit data directory, bypassing the OS default
/// * `launch` - Launch query string (`id`, `token`, `artifact_id`, `base_url`)
pub fn initialize(data_override: Option<PathBuf>, launch: Option<&str>) -> Result<WaypointContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = WaypointConfig::load(&data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), ?config, "initializing");

    let geocoder = NominatimGeocoder::new(&config.geocoder_url, config.search_limit)?;
    let artifacts = HttpArtifactClient::new()?;
    let persistence = Persistence::with_backend(FsBackend::new(data_dir.clone()));

    let api = WaypointApi::open(
        persistence,
        config,
        parse_launch(launch),
        Box::new(geocoder),
        Box::new(artifacts),
    )?;

    Ok(WaypointContext { api, data_dir })
}
