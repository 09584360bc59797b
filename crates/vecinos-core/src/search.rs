//! Search parameters and the tagged states of the nearby-search workflow.

use std::sync::Arc;

use thiserror::Error;

use crate::geo::Coordinates;
use crate::provider::Provider;
use crate::ParameterError;

pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// User-controlled search inputs: radius and optional specialty filter.
///
/// The specialty is stored trimmed; a blank filter is the same as no filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    radius_km: f64,
    specialty: Option<String>,
}

impl SearchParameters {
    /// # Errors
    ///
    /// Returns [`ParameterError::RadiusOutOfRange`] when `radius_km` is not
    /// within [`MIN_RADIUS_KM`]..=[`MAX_RADIUS_KM`].
    pub fn new(radius_km: f64, specialty: Option<&str>) -> Result<Self, ParameterError> {
        let mut params = Self {
            radius_km: DEFAULT_RADIUS_KM,
            specialty: None,
        };
        params.set_radius_km(radius_km)?;
        if let Some(s) = specialty {
            params.set_specialty(s);
        }
        Ok(params)
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// # Errors
    ///
    /// Returns [`ParameterError::RadiusOutOfRange`] and leaves the current
    /// radius untouched when `radius_km` is out of bounds or not finite.
    pub fn set_radius_km(&mut self, radius_km: f64) -> Result<(), ParameterError> {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return Err(ParameterError::RadiusOutOfRange {
                value: radius_km,
                min: MIN_RADIUS_KM,
                max: MAX_RADIUS_KM,
            });
        }
        self.radius_km = radius_km;
        Ok(())
    }

    #[must_use]
    pub fn specialty(&self) -> Option<&str> {
        self.specialty.as_deref()
    }

    pub fn set_specialty(&mut self, specialty: &str) {
        let trimmed = specialty.trim();
        self.specialty = (!trimmed.is_empty()).then(|| trimmed.to_owned());
    }

    pub fn clear_specialty(&mut self) {
        self.specialty = None;
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            specialty: None,
        }
    }
}

/// Why the device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission was denied; nearby search is not possible")]
    PermissionDenied,

    #[error("location information is unavailable")]
    PositionUnavailable,

    #[error("the location request timed out")]
    Timeout,

    #[error("geolocation is not supported on this device")]
    Unsupported,
}

/// Result of a single-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GeolocationState {
    #[default]
    Pending,
    Available(Coordinates),
    Unavailable(GeolocationError),
}

impl GeolocationState {
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Available(coords) => Some(*coords),
            Self::Pending | Self::Unavailable(_) => None,
        }
    }
}

/// Network-level cause of a failed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The server answered with a non-success HTTP status.
    Status(u16),
    /// The request never produced an HTTP response.
    Transport,
}

impl std::fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Transport => f.write_str("transport error"),
        }
    }
}

/// Failure kinds surfaced to the user by the search workflow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchFailure {
    #[error("geolocation unavailable: {cause}")]
    GeolocationUnavailable { cause: GeolocationError },

    #[error("network failure: {0}")]
    NetworkFailure(NetworkFailure),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not authenticated")]
    Unauthenticated,
}

impl SearchFailure {
    /// Banner text for the failure, one message per failure kind.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::GeolocationUnavailable { cause } => format!("Location error: {cause}"),
            Self::NetworkFailure(NetworkFailure::Status(status)) => {
                format!("The server could not complete the search (HTTP {status}). Try again.")
            }
            Self::NetworkFailure(NetworkFailure::Transport) => {
                "Could not reach the server. Check your connection and try again.".to_owned()
            }
            Self::MalformedResponse(_) => {
                "The server sent an unexpected response. Try again later.".to_owned()
            }
            Self::Unauthenticated => "Your session has expired. Log in again.".to_owned(),
        }
    }
}

/// State of the nearby search; exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Loaded(Arc<[Provider]>),
    Failed(SearchFailure),
}

impl SearchState {
    #[must_use]
    pub fn providers(&self) -> Option<&Arc<[Provider]>> {
        match self {
            Self::Loaded(providers) => Some(providers),
            Self::Idle | Self::Loading | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
