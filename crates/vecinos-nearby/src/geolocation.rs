//! Single-shot device position requests.
//!
//! A [`PositionSource`] answers one request at a time; [`request_position`]
//! wraps it with the caller's timeout and folds the outcome into a
//! [`GeolocationState`]. Nothing here retries: a failed request stays failed
//! until the caller asks again.

use std::time::Duration;

use async_trait::async_trait;
use vecinos_core::{Coordinates, GeolocationError, GeolocationState};

pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_POSITION_TIMEOUT,
        }
    }
}

/// Anything able to produce the device's current position once.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns the [`GeolocationError`] describing why no position could be
    /// obtained.
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Requests the position once and resolves to `Available` or `Unavailable`.
///
/// Sources that exceed `options.timeout` resolve to
/// `Unavailable(Timeout)`. A source that reports non-finite or out-of-range
/// coordinates resolves to `Unavailable(PositionUnavailable)`.
pub async fn request_position<S>(source: &S, options: &PositionOptions) -> GeolocationState
where
    S: PositionSource + ?Sized,
{
    let outcome = tokio::time::timeout(options.timeout, source.current_position(options)).await;

    match outcome {
        Ok(Ok(coords)) if coords.is_valid() => {
            tracing::debug!(%coords, "device position available");
            GeolocationState::Available(coords)
        }
        Ok(Ok(coords)) => {
            tracing::warn!(lat = coords.lat, lng = coords.lng, "position source returned invalid coordinates");
            GeolocationState::Unavailable(GeolocationError::PositionUnavailable)
        }
        Ok(Err(cause)) => {
            tracing::warn!(%cause, "device position unavailable");
            GeolocationState::Unavailable(cause)
        }
        Err(_) => {
            tracing::warn!(timeout_ms = options.timeout.as_millis(), "position request timed out");
            GeolocationState::Unavailable(GeolocationError::Timeout)
        }
    }
}

/// Position source backed by a configured value rather than hardware.
///
/// The CLI uses it with the position from configuration; tests use it to
/// script denials and timeouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition {
    outcome: Result<Coordinates, GeolocationError>,
}

impl FixedPosition {
    #[must_use]
    pub fn at(coords: Coordinates) -> Self {
        Self { outcome: Ok(coords) }
    }

    #[must_use]
    pub fn failing(cause: GeolocationError) -> Self {
        Self {
            outcome: Err(cause),
        }
    }
}

impl From<Option<Coordinates>> for FixedPosition {
    fn from(coords: Option<Coordinates>) -> Self {
        coords.map_or(Self::failing(GeolocationError::Unsupported), Self::at)
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        self.outcome
    }
}
