//! Normalized search result entries.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Server-assigned identifier of a user/provider.
///
/// The API hands out either numeric or string ids; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

impl ProviderId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<i64> for ProviderId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// A trade or skill declared by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub name: String,
    pub years_experience: u32,
    pub description: Option<String>,
}

/// A service professional returned by a nearby search.
///
/// Built once per successful response and never patched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `None` when the server did not report a position for this provider.
    pub coordinates: Option<Coordinates>,
    /// Authoritative distance from the searching user, as computed by the server.
    pub distance_meters: f64,
    /// `distance_meters` in kilometres, rounded to one decimal.
    pub distance_km: f64,
    pub specialties: Vec<Specialty>,
    /// Specialty names in declaration order, for compact rendering.
    pub specialty_names: Vec<String>,
    pub photo_url: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl Provider {
    /// Given name followed by the last name when one is known.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Upper-cased first letter of the name, `?` for an empty name.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect())
    }

    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{:.1} km", self.distance_km)
    }
}

/// Converts a server distance in metres to kilometres rounded to one decimal.
#[must_use]
pub fn distance_km_for_display(distance_meters: f64) -> f64 {
    (distance_meters / 100.0).round() / 10.0
}
