//! Geographic coordinates as reported by the device and the API.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
///
/// Both components must be finite and inside the valid latitude/longitude
/// range; anything else is an unknown position and never reaches the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Builds a position, returning `None` when either component is not a
    /// finite in-range number.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let coords = Self { lat, lng };
        coords.is_valid().then_some(coords)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// `true` when both components differ from `other` by less than `epsilon` degrees.
    #[must_use]
    pub fn within(&self, other: &Coordinates, epsilon: f64) -> bool {
        (self.lat - other.lat).abs() < epsilon && (self.lng - other.lng).abs() < epsilon
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}
