//! Domain model and configuration shared by the vecinos client crates.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod provider;
pub mod search;
pub mod session;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::Coordinates;
pub use provider::{distance_km_for_display, Provider, ProviderId, Specialty};
pub use search::{
    GeolocationError, GeolocationState, NetworkFailure, SearchFailure, SearchParameters,
    SearchState, DEFAULT_RADIUS_KM, MAX_RADIUS_KM, MIN_RADIUS_KM,
};
pub use session::{Credential, Session};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejected user input for the search parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("radius {value} km is outside the allowed range {min}-{max} km")]
    RadiusOutOfRange { value: f64, min: f64, max: f64 },
}
