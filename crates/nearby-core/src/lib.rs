//! Core types and logic for the neighborhood facility finder.
//!
//! Everything here is synchronous and free of I/O except catalog and config
//! loading. The HTTP server and the CLI are thin shells over [`search`].

mod app_config;
mod config;
pub mod geo;
mod mock;
pub mod places;
pub mod search;
pub mod session;

use thiserror::Error;

pub use app_config::{AppConfig, CatalogSourceKind, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance, Coordinate, EARTH_RADIUS_METERS};
pub use places::{load_catalog, Catalog, CatalogFile, CatalogSource, Category, Place};
pub use search::{rank, search, RankedPlace, SearchQuery, SearchResult, DEFAULT_RADIUS_METERS};
pub use session::{
    LocationSource, Phase, ResolvedLocation, SessionEvent, SessionState, DEFAULT_LOCATION,
};

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid radius {0}: must be a finite number greater than 0")]
    InvalidRadius(f64),

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
