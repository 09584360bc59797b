//! Normalization from raw nearby records to [`Provider`].
//!
//! Structural problems in a single record drop that record only; the rest of
//! the response is kept. A missing position is not a problem: the provider
//! stays in the list and simply gets no map marker.

use thiserror::Error;
use vecinos_api::{RawNumber, RawProvider, RawSpecialty};
use vecinos_core::{distance_km_for_display, Coordinates, Provider, ProviderId, Specialty};

/// Why a raw record was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum RecordRejection {
    #[error("name is blank")]
    BlankName,

    #[error("coordinates are present but invalid")]
    InvalidCoordinates,

    #[error("distance is missing")]
    MissingDistance,

    #[error("distance is not a finite non-negative number")]
    InvalidDistance,
}

/// Normalizes every record, dropping malformed ones and the caller's own entry.
///
/// Server order (ascending distance) is preserved.
#[must_use]
pub fn normalize_providers(records: Vec<RawProvider>, own_id: Option<&ProviderId>) -> Vec<Provider> {
    let total = records.len();
    let mut dropped = 0usize;

    let providers: Vec<Provider> = records
        .into_iter()
        .filter_map(|raw| {
            let id = ProviderId::from(&raw.id);
            if own_id == Some(&id) {
                tracing::debug!(%id, "excluding own user from nearby results");
                return None;
            }
            match normalize_provider(raw) {
                Ok(provider) => Some(provider),
                Err(reason) => {
                    dropped += 1;
                    tracing::warn!(%id, %reason, "dropping malformed nearby record");
                    None
                }
            }
        })
        .collect();

    tracing::debug!(total, kept = providers.len(), dropped, "normalized nearby records");
    providers
}

pub(crate) fn normalize_provider(raw: RawProvider) -> Result<Provider, RecordRejection> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(RecordRejection::BlankName);
    }

    let coordinates = normalize_coordinates(raw.lat.as_ref(), raw.lng.as_ref())?;

    let distance_meters = present(raw.distance_meters.as_ref())
        .ok_or(RecordRejection::MissingDistance)?
        .as_f64()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or(RecordRejection::InvalidDistance)?;

    let specialties: Vec<Specialty> = raw
        .specialties
        .into_iter()
        .filter_map(normalize_specialty)
        .collect();
    let specialty_names = specialties.iter().map(|s| s.name.clone()).collect();

    Ok(Provider {
        id: ProviderId::from(raw.id),
        name: name.to_owned(),
        last_name: non_blank(raw.last_name),
        email: non_blank(raw.email),
        coordinates,
        distance_meters,
        distance_km: distance_km_for_display(distance_meters),
        specialties,
        specialty_names,
        photo_url: non_blank(raw.photo_url),
        phone: non_blank(raw.phone),
        description: non_blank(raw.description),
    })
}

/// `Ok(None)` when the record has no position at all; an error when a
/// position is present but unusable.
fn normalize_coordinates(
    lat: Option<&RawNumber>,
    lng: Option<&RawNumber>,
) -> Result<Option<Coordinates>, RecordRejection> {
    match (present(lat), present(lng)) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let lat = lat.as_f64().ok_or(RecordRejection::InvalidCoordinates)?;
            let lng = lng.as_f64().ok_or(RecordRejection::InvalidCoordinates)?;
            Coordinates::new(lat, lng)
                .map(Some)
                .ok_or(RecordRejection::InvalidCoordinates)
        }
        _ => Err(RecordRejection::InvalidCoordinates),
    }
}

fn normalize_specialty(raw: RawSpecialty) -> Option<Specialty> {
    let name = raw.name.trim();
    if name.is_empty() {
        return None;
    }
    let years_experience = raw.years_experience.as_ref().map_or(0, RawNumber::as_years);

    Some(Specialty {
        name: name.to_owned(),
        years_experience,
        description: non_blank(raw.description),
    })
}

/// Treats an empty numeric string the same as an absent field.
fn present(value: Option<&RawNumber>) -> Option<&RawNumber> {
    value.filter(|v| !matches!(v, RawNumber::Text(s) if s.trim().is_empty()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
