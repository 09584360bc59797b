//! Location report and nearby search endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use vecinos_core::{Coordinates, Credential};

use super::VecinosClient;
use crate::error::ApiError;
use crate::types::{LocationUpdate, RawProvider};

/// Inputs of one `GET /users/nearby` call.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub coordinates: Coordinates,
    pub radius_km: f64,
    pub specialty: Option<String>,
}

impl NearbyQuery {
    /// The specialty to send, trimmed. Blank filters yield `None` so the
    /// parameter is left out of the request entirely.
    #[must_use]
    pub fn specialty_filter(&self) -> Option<&str> {
        self.specialty
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The two calls the nearby-search workflow makes against the API.
#[async_trait]
pub trait NearbyApi: Send + Sync {
    /// Stores the caller's current position server-side.
    async fn report_location(
        &self,
        credential: &Credential,
        coordinates: Coordinates,
    ) -> Result<(), ApiError>;

    /// Lists providers within `query.radius_km` of `query.coordinates`,
    /// ordered by distance.
    async fn search_nearby(
        &self,
        credential: &Credential,
        query: &NearbyQuery,
    ) -> Result<Vec<RawProvider>, ApiError>;
}

#[async_trait]
impl<T: NearbyApi + ?Sized> NearbyApi for Arc<T> {
    async fn report_location(
        &self,
        credential: &Credential,
        coordinates: Coordinates,
    ) -> Result<(), ApiError> {
        (**self).report_location(credential, coordinates).await
    }

    async fn search_nearby(
        &self,
        credential: &Credential,
        query: &NearbyQuery,
    ) -> Result<Vec<RawProvider>, ApiError> {
        (**self).search_nearby(credential, query).await
    }
}

impl VecinosClient {
    /// Builds the `users/nearby` URL. The `especialidad` parameter is only
    /// present for a non-blank filter.
    pub(crate) fn nearby_url(&self, query: &NearbyQuery) -> Result<reqwest::Url, ApiError> {
        let lat = query.coordinates.lat.to_string();
        let lng = query.coordinates.lng.to_string();
        let radius = query.radius_km.to_string();
        let mut params = vec![
            ("lat", lat.as_str()),
            ("lng", lng.as_str()),
            ("radius", radius.as_str()),
        ];
        if let Some(specialty) = query.specialty_filter() {
            params.push(("especialidad", specialty));
        }
        self.build_url("users/nearby", &params)
    }
}

#[async_trait]
impl NearbyApi for VecinosClient {
    /// `PUT users/location` with `{ lat, lng }`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] on 401/403.
    /// - [`ApiError::Status`] on any other non-2xx status.
    /// - [`ApiError::Http`] on transport failure.
    async fn report_location(
        &self,
        credential: &Credential,
        coordinates: Coordinates,
    ) -> Result<(), ApiError> {
        let url = self.build_url("users/location", &[])?;
        let body = LocationUpdate {
            lat: coordinates.lat,
            lng: coordinates.lng,
        };
        tracing::debug!(%url, lat = body.lat, lng = body.lng, "reporting location");

        let response = self
            .client
            .put(url.clone())
            .bearer_auth(credential.token())
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response, &url, true).await?;
        Ok(())
    }

    /// `GET users/nearby?lat=..&lng=..&radius=..[&especialidad=..]`.
    ///
    /// Individual entries that do not match the record shape are skipped with
    /// a warning; the rest of the list is returned.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] on 401/403.
    /// - [`ApiError::Status`] on any other non-2xx status.
    /// - [`ApiError::Http`] on transport failure.
    /// - [`ApiError::Deserialize`] if the body is not a JSON array.
    async fn search_nearby(
        &self,
        credential: &Credential,
        query: &NearbyQuery,
    ) -> Result<Vec<RawProvider>, ApiError> {
        let url = self.nearby_url(query)?;
        tracing::debug!(%url, "searching nearby providers");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(credential.token())
            .send()
            .await?;
        let response = Self::ensure_success(response, &url, true).await?;
        let entries: Vec<serde_json::Value> = Self::decode(response, "users/nearby").await?;

        let total = entries.len();
        let records: Vec<RawProvider> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, v)| {
                serde_json::from_value::<RawProvider>(v)
                    .map_err(|e| {
                        tracing::warn!(index = idx, error = %e, "search_nearby: skipping malformed entry");
                    })
                    .ok()
            })
            .collect();

        tracing::debug!(total, kept = records.len(), "nearby search response decoded");
        Ok(records)
    }
}
