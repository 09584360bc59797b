//! Wire types for the vecinos REST API.
//!
//! Field names on the wire are Spanish (`nombre`, `especialidades`, ...);
//! the Rust side uses English names with `#[serde(rename)]`.
//!
//! ### Numbers that arrive as strings
//! `lat`, `lng` and `distance_m` come straight out of a PostGIS query and are
//! serialized either as JSON numbers or as numeric strings depending on the
//! column type. [`RawNumber`] accepts both; parsing to `f64` happens during
//! normalization so one bad record does not fail the whole response.

use serde::{Deserialize, Serialize};
use vecinos_core::ProviderId;

/// A numeric field that may be encoded as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// The value as `f64`, or `None` when the text does not parse.
    ///
    /// Non-finite results are returned as-is; callers decide what to do with them.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// The value as whole years of experience.
    ///
    /// Negative, non-finite or non-numeric values read as zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_years(&self) -> u32 {
        self.as_f64()
            .filter(|y| y.is_finite() && *y >= 0.0)
            .map_or(0, |y| y.round().min(f64::from(u32::MAX)) as u32)
    }
}

/// A user id encoded as a JSON integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for ProviderId {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Int(n) => ProviderId::from(n),
            RawId::Text(s) => ProviderId(s),
        }
    }
}

impl From<&RawId> for ProviderId {
    fn from(id: &RawId) -> Self {
        ProviderId::from(id.clone())
    }
}

/// One entry of `GET /users/nearby`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProvider {
    pub id: RawId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub lat: Option<RawNumber>,
    #[serde(default)]
    pub lng: Option<RawNumber>,
    #[serde(rename = "distance_m", default)]
    pub distance_meters: Option<RawNumber>,
    #[serde(rename = "foto_url", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "especialidades", default, deserialize_with = "null_as_empty")]
    pub specialties: Vec<RawSpecialty>,
}

/// A specialty entry as returned inside a nearby record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecialty {
    #[serde(rename = "especialidad")]
    pub name: String,
    #[serde(rename = "experiencia", default)]
    pub years_experience: Option<RawNumber>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Body of `PUT /users/location`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct LocationUpdate {
    pub lat: f64,
    pub lng: f64,
}

/// Error body the API sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub nombre: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

/// Minimal user identity returned by login.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub id: RawId,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of a successful `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: RawId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
}

/// The signed-in user's profile, as returned by `GET /users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: RawId,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "apellido", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "foto_url", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "especialidades", default, deserialize_with = "null_as_empty")]
    pub specialties: Vec<ProfileSpecialty>,
}

/// A specialty as stored on the user's own profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpecialty {
    #[serde(rename = "especialidad")]
    pub name: String,
    #[serde(rename = "experiencia", default, deserialize_with = "lenient_years")]
    pub years_experience: u32,
    #[serde(rename = "descripcion", default, deserialize_with = "null_as_default")]
    pub description: String,
}

fn lenient_years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<RawNumber>::deserialize(deserializer)?.map_or(0, |n| n.as_years()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
