use crate::draft::DraftError;
use crate::schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaypointError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    /// A stored value exists but cannot be decoded as text.
    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error("Invalid location data: {0}")]
    Schema(#[from] SchemaError),

    #[error("Cannot save location: {0}")]
    Draft(#[from] DraftError),

    #[error("Remote artifact error: {0}")]
    Remote(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WaypointError>;
